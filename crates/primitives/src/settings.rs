use std::{io, path::Path};

use serde::{Deserialize, Serialize};

/// Default upper bound on the size of a raw transaction.
pub const DEFAULT_MAX_RAW_SIZE: usize = 128 * 1024;

/// Decoder configuration, read from TOML.
///
/// ```toml
/// max_raw_size = 65536
/// disabled_types = [0x0a, 0x12]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    /// Largest raw transaction, type byte included, that the registry will decode.
    pub max_raw_size: usize,
    /// Type tags left out of the registry.
    pub disabled_types: Vec<u8>,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self { max_raw_size: DEFAULT_MAX_RAW_SIZE, disabled_types: Vec::new() }
    }
}

impl DecoderSettings {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let toml = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml).map_err(io::Error::other)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml)
    }

    /// Returns `true` if `tag` is listed in `disabled_types`.
    pub fn is_disabled(&self, tag: u8) -> bool {
        self.disabled_types.contains(&tag)
    }
}
