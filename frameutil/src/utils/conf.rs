use log::debug;
use serde::Deserialize;

use crate::{
    magic::{DESCRIPTION_MAX_LEN, DESCRIPTION_TRUNCATION_MARKER, ENV_DESCRIPTION_MAX_LEN},
    utils::error::{PropResult, PropertyError},
};

/// Settings for [`crate::object::object_description_with`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Number of characters kept before the description is cut.
    pub max_len: usize,
    /// Suffix appended to a cut description.
    pub marker: String,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            max_len: DESCRIPTION_MAX_LEN,
            marker: DESCRIPTION_TRUNCATION_MARKER.to_string(),
        }
    }
}

impl DescriptionConfig {
    /// Load a config from a TOML document. Missing keys keep their default value.
    pub fn from_toml_str(toml_str: &str) -> PropResult<Self> {
        toml::from_str(toml_str).map_err(|source| PropertyError::ConfigParse { source })
    }

    /// Default config, with `max_len` taken from [`ENV_DESCRIPTION_MAX_LEN`] when it is set to a
    /// valid number.
    pub fn from_env() -> Self {
        let raw = std::env::var(ENV_DESCRIPTION_MAX_LEN).ok();
        Self::default().with_max_len_override(raw.as_deref())
    }

    fn with_max_len_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match raw.trim().parse() {
                Ok(max_len) => self.max_len = max_len,
                Err(_) => debug!(
                    "Ignoring {}={:?}: not a valid length",
                    ENV_DESCRIPTION_MAX_LEN, raw
                ),
            }
        }
        self
    }
}
