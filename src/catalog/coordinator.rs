//! Refresh cycles, the refresh schedule and cache lookups.
//!
//! A refresh cycle fetches every `(media type, bucket)` pair concurrently and
//! publishes the results as a single new snapshot. If any fetch fails the whole
//! cycle is discarded and the previous snapshot stays current. At most one
//! cycle runs at a time; a cycle requested while another is in flight is
//! skipped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use futures::future::try_join_all;
use streamcat_common::{MediaType, Meta};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::snapshot::{BucketSpec, CatalogSnapshot};
use super::store::CatalogStore;
use crate::gateway::CatalogGateway;

/// Result of a call to [`CatalogCoordinator::refresh_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was published.
    Published {
        generation: u64,
        buckets: usize,
        items: usize,
    },
    /// Another cycle was already in flight; nothing was fetched.
    Skipped,
    /// A fetch failed; the previous snapshot is still current.
    Failed(String),
}

struct Inner {
    gateway: Arc<dyn CatalogGateway>,
    buckets: Vec<BucketSpec>,
    store: CatalogStore,
    refreshing: AtomicBool,
    empty: Arc<Vec<Meta>>,
}

/// Owner of the catalog cache.
///
/// Cheap to clone; all clones share the same store and busy flag.
#[derive(Clone)]
pub struct CatalogCoordinator {
    inner: Arc<Inner>,
}

impl CatalogCoordinator {
    /// Create a coordinator whose store starts with every bucket empty.
    pub fn new(gateway: Arc<dyn CatalogGateway>, buckets: Vec<BucketSpec>) -> Self {
        let store = CatalogStore::new(CatalogSnapshot::empty(&buckets));
        Self {
            inner: Arc::new(Inner {
                gateway,
                buckets,
                store,
                refreshing: AtomicBool::new(false),
                empty: Arc::new(Vec::new()),
            }),
        }
    }

    /// Configured buckets, in manifest order.
    pub fn buckets(&self) -> &[BucketSpec] {
        &self.inner.buckets
    }

    /// The snapshot that is current right now.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.store.current()
    }

    /// Whether a refresh cycle is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::Acquire)
    }

    /// Entries of one bucket in the current snapshot.
    ///
    /// Unknown keys yield an empty list. Never blocks on a refresh.
    pub fn lookup(&self, media_type: MediaType, key: &str) -> Arc<Vec<Meta>> {
        self.snapshot()
            .get(media_type, key)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.inner.empty))
    }

    /// Run one refresh cycle.
    pub async fn refresh_cycle(&self) -> RefreshOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.inner.refreshing) else {
            debug!("Catalog refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let generation = self.snapshot().generation() + 1;
        let started = Instant::now();
        info!(
            generation,
            buckets = self.inner.buckets.len(),
            gateway = self.inner.gateway.name(),
            "Starting catalog refresh"
        );

        let gateway = self.inner.gateway.as_ref();
        let fetches = self
            .inner
            .buckets
            .iter()
            .flat_map(|bucket| MediaType::ALL.into_iter().map(move |mt| (mt, bucket)))
            .map(|(media_type, bucket)| async move {
                let metas = gateway
                    .fetch_category(media_type, &bucket.providers, &bucket.region)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to fetch {media_type}/{} ({} @ {})",
                            bucket.key,
                            bucket.providers.join(","),
                            bucket.region
                        )
                    })?;
                debug!(
                    media_type = %media_type,
                    bucket = %bucket.key,
                    count = metas.len(),
                    "Fetched bucket"
                );
                Ok::<_, anyhow::Error>((media_type, bucket.key.clone(), metas))
            });

        let results = match try_join_all(fetches).await {
            Ok(results) => results,
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(
                    generation,
                    error = %reason,
                    "Catalog refresh failed, keeping previous snapshot"
                );
                return RefreshOutcome::Failed(reason);
            }
        };

        match self
            .inner
            .store
            .publish(CatalogSnapshot::from_results(generation, results))
        {
            Ok(published) => {
                info!(
                    generation,
                    items = published.item_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Published catalog snapshot"
                );
                RefreshOutcome::Published {
                    generation,
                    buckets: published.bucket_count(),
                    items: published.item_count(),
                }
            }
            Err(e) => {
                error!(error = %e, "Catalog snapshot rejected by store");
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run a refresh cycle now and then every `every`, until `cancel` fires.
    ///
    /// Each tick starts the cycle in its own task, so a cycle that outlives
    /// the interval makes the following ticks skip. A panicking cycle is
    /// logged and does not stop the schedule.
    pub fn start_schedule(&self, every: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycles = JoinSet::new();

            info!(
                interval_ms = every.as_millis() as u64,
                "Catalog refresh schedule started"
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let cycle = coordinator.clone();
                        cycles.spawn(async move { cycle.refresh_cycle().await });
                    }
                    Some(finished) = cycles.join_next() => {
                        if let Err(e) = finished {
                            if e.is_panic() {
                                error!(error = %e, "Catalog refresh panicked");
                            }
                        }
                    }
                }
            }

            cycles.shutdown().await;
            info!("Catalog refresh schedule stopped");
        })
    }
}

/// Claims the busy flag for the lifetime of the guard.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
