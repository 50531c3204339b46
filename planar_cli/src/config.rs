//! Config file loading.

use std::fs;
use std::path::{Path, PathBuf};

use lib_planar::CodecConfig;
use log::debug;
use serde::Deserialize;

use crate::error::CliError;
use crate::CliOutputMode;

/// Contents of a `--config` TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Codec parameters
    #[serde(default)]
    pub codec: CodecConfig,

    /// Output defaults
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Output mode when `--mode` is not given
    #[serde(default)]
    pub mode: Option<CliOutputMode>,

    /// Standalone palette file to write alongside the planes
    #[serde(default)]
    pub palette: Option<PathBuf>,
}

pub fn load(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };

    let content = fs::read_to_string(path)?;
    let config = parse(&content)?;
    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

pub fn parse(content: &str) -> Result<ConfigFile, CliError> {
    Ok(toml::from_str(content)?)
}
