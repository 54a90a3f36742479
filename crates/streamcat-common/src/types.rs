//! Core type definitions for catalog entries.
//!
//! [`MediaType`] has two spellings: the upper-case object type understood by the
//! upstream gateway (`MOVIE`, `SHOW`) and the lower-case presentation type used
//! by addon clients in URLs and payloads (`movie`, `series`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A feature film.
    Movie,
    /// A TV series.
    #[serde(rename = "series")]
    Show,
}

impl MediaType {
    /// Every media type, in the order catalogs are advertised.
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Show];

    /// Object type name used by the upstream gateway.
    pub fn gateway_name(self) -> &'static str {
        match self {
            Self::Movie => "MOVIE",
            Self::Show => "SHOW",
        }
    }

    /// Type name used by addon clients.
    pub fn presentation_name(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "series",
        }
    }

    /// Parse a client-facing type name. Anything other than `movie` or
    /// `series` yields `None`.
    pub fn from_presentation(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Show),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.presentation_name())
    }
}

/// A single catalog entry as served to addon clients.
///
/// Only the fields needed to identify an entry and substitute its poster are
/// typed; everything else the gateway produced is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Entry identifier, normally an IMDb id (`tt...`).
    pub id: String,
    /// Presentation type (`movie` or `series`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Display title.
    pub name: String,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Meta {
    /// Build a bare entry with no poster and no extra fields.
    pub fn new(id: impl Into<String>, media_type: MediaType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: media_type.presentation_name().to_string(),
            name: name.into(),
            poster: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the poster URL.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Attach an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
