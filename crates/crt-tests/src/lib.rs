//! Integration tests for the CRT crates.
//!
//! End-to-end checks of decode, the CRT pass and encode working together.

#[cfg(test)]
mod digest;
