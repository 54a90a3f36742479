//! Streamcat-Common: Shared types and errors.
//!
//! This crate provides the vocabulary shared between the catalog cache, the
//! metadata gateway client and the HTTP layer:
//!
//! - **Media types**: [`MediaType`] with its gateway and presentation spellings
//! - **Catalog entries**: the opaque [`Meta`] record served to addon clients
//! - **Error handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use streamcat_common::{MediaType, Meta};
//!
//! let media_type = MediaType::from_presentation("series").unwrap();
//! assert_eq!(media_type, MediaType::Show);
//! assert_eq!(media_type.gateway_name(), "SHOW");
//!
//! let meta = Meta::new("tt0903747", media_type, "Breaking Bad");
//! assert_eq!(meta.kind, "series");
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
