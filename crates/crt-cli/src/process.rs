//! Load, run the CRT pass, save.

use std::path::Path;

use anyhow::{bail, Context, Result};
use crt_io::{Format, WriteOptions};
use crt_ops::CrtParams;
use tracing::info;

pub fn run(input: &Path, output: &Path, params: &CrtParams, options: &WriteOptions) -> Result<()> {
    // fail before decoding and warping if the result could not be saved
    if Format::from_extension(output) == Format::Unknown {
        bail!("Unsupported output format: {}", output.display());
    }

    let image = crt_io::read(input)
        .with_context(|| format!("Failed to load: {}", input.display()))?;
    info!(
        input = %input.display(),
        width = image.width(),
        height = image.height(),
        "loaded"
    );

    let result = crt_ops::apply_crt(image, params).context("CRT pass failed")?;

    crt_io::write_with_options(output, &result, options)
        .with_context(|| format!("Failed to save: {}", output.display()))?;
    info!(output = %output.display(), "saved");

    Ok(())
}
