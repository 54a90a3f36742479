//! In-memory catalog cache and its refresh coordinator.
//!
//! The cache is a sequence of immutable [`CatalogSnapshot`] generations. The
//! [`CatalogCoordinator`] is the only writer: it pulls every configured bucket
//! from a [`CatalogGateway`](crate::gateway::CatalogGateway), assembles a new
//! snapshot off to the side and publishes it to the [`CatalogStore`] in one
//! pointer swap. Request handlers only ever read the current generation.
//!
//! # Module layout
//!
//! - [`snapshot`] -- Bucket configuration and the immutable snapshot type.
//! - [`store`] -- Holder of the current snapshot (single writer, many readers).
//! - [`coordinator`] -- Refresh cycles, the refresh schedule and lookups.

pub mod coordinator;
pub mod snapshot;
pub mod store;

pub use coordinator::{CatalogCoordinator, RefreshOutcome};
pub use snapshot::{BucketSpec, CatalogSnapshot};
pub use store::CatalogStore;
