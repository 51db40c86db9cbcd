// src/config/io.rs
//! Reading `recnet.toml`.

use std::path::Path;

use super::types::RecnetToml;
use crate::error::{RecnetError, Result};

/// Reads the config file. A missing file yields `None`.
///
/// # Errors
/// Returns `Io` for unreadable files and `Toml` for malformed content.
pub fn load_toml_config(path: &Path) -> Result<Option<RecnetToml>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| RecnetError::io(e, path))?;
    parse_toml(&content).map(Some)
}

/// Parses config content; absent sections and keys take their defaults.
///
/// # Errors
/// Returns `Toml` for malformed content.
pub fn parse_toml(content: &str) -> Result<RecnetToml> {
    Ok(toml::from_str(content)?)
}
