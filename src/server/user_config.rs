//! Decoding of the per-user configuration path segment.
//!
//! Configured installs prefix every addon URL with one opaque segment. It is
//! either URL-encoded JSON or base64 (URL-safe or standard, padded or not)
//! JSON. Anything that does not decode yields the defaults, so a bad segment
//! never breaks catalog serving.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

/// Preferences carried in a configured install URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Rating-poster API key; when set, posters are substituted.
    #[serde(rename = "rpdbKey", alias = "rpdb_key")]
    pub rpdb_key: Option<String>,
}

impl UserConfig {
    /// Decode a configuration segment, falling back to defaults.
    pub fn from_segment(segment: &str) -> Self {
        match Self::decode(segment) {
            Some(config) => config,
            None => {
                tracing::debug!(segment, "Undecodable configuration segment, using defaults");
                Self::default()
            }
        }
    }

    fn decode(segment: &str) -> Option<Self> {
        if let Ok(config) = serde_json::from_str(segment) {
            return Some(config);
        }

        [URL_SAFE_NO_PAD, URL_SAFE, STANDARD_NO_PAD, STANDARD]
            .iter()
            .filter_map(|engine| engine.decode(segment).ok())
            .find_map(|bytes| serde_json::from_slice(&bytes).ok())
    }

    /// The poster key, if one is set and non-blank.
    pub fn poster_key(&self) -> Option<&str> {
        self.rpdb_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
