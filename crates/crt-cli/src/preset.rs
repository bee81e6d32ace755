//! YAML presets and command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use crt_io::{WriteOptions, DEFAULT_JPEG_QUALITY};
use crt_ops::CrtParams;
use serde::{Deserialize, Serialize};

/// Contents of a `--preset` file.
///
/// ```yaml
/// strength: 0.2
/// noise_sigma: 6.0
/// seed: 42
/// jpeg_quality: 90
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    #[serde(flatten)]
    pub effect: CrtParams,
    pub jpeg_quality: Option<u8>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub strength: Option<f32>,
    pub seed: Option<u64>,
    pub noise_sigma: Option<f32>,
    pub brightness: Option<f64>,
    pub quality: Option<u8>,
}

impl Preset {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid preset: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        // an empty file is a valid, empty preset
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies command-line values on top of the preset.
    pub fn resolve(mut self, over: &Overrides) -> (CrtParams, WriteOptions) {
        let effect = &mut self.effect;
        if let Some(v) = over.strength {
            effect.strength = v;
        }
        if let Some(v) = over.noise_sigma {
            effect.noise_sigma = v;
        }
        if let Some(v) = over.brightness {
            effect.brightness = v;
        }
        if over.seed.is_some() {
            effect.seed = over.seed;
        }

        let jpeg_quality = over
            .quality
            .or(self.jpeg_quality)
            .unwrap_or(DEFAULT_JPEG_QUALITY);
        (self.effect, WriteOptions { jpeg_quality })
    }
}
