//! Metadata gateway: where catalog listings come from.
//!
//! The catalog cache only depends on the [`CatalogGateway`] trait. The
//! production implementation is [`JustWatchGateway`], which queries a
//! GraphQL popularity listing per provider lineup and region.
//!
//! # Module layout
//!
//! - [`justwatch`] -- GraphQL client with rate limiting and 429 back-off.
//! - [`posters`] -- Serve-time poster substitution.

pub mod justwatch;
pub mod posters;

use async_trait::async_trait;
use streamcat_common::{MediaType, Meta};

pub use justwatch::JustWatchGateway;
pub use posters::transform_posters;

/// Async source of categorized media listings.
///
/// Implementations own their transport concerns (timeouts, retries, rate
/// limits). A returned error means the listing is unusable; callers do not
/// retry.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Short, lowercase identifier used in logs (e.g. `"justwatch"`).
    fn name(&self) -> &'static str;

    /// Fetch the listing for `media_type` restricted to the provider
    /// packages in `providers`, as seen from `region`.
    ///
    /// Entries are returned in upstream ranking order.
    async fn fetch_category(
        &self,
        media_type: MediaType,
        providers: &[String],
        region: &str,
    ) -> anyhow::Result<Vec<Meta>>;
}
