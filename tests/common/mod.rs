//! Shared test harness for integration tests.
//!
//! Provides [`StubGateway`], a scriptable in-memory [`CatalogGateway`], and
//! [`TestHarness`], which wires it into a [`CatalogCoordinator`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use streamcat::catalog::{BucketSpec, CatalogCoordinator};
use streamcat::config::{default_buckets, Config};
use streamcat::gateway::CatalogGateway;
use streamcat::server::{create_router, AppContext};
use streamcat_common::{MediaType, Meta};

/// Deterministic gateway: every call answers two entries derived from the
/// request and the current round, so snapshots from different rounds are
/// distinguishable.
pub struct StubGateway {
    calls: AtomicUsize,
    round: AtomicUsize,
    panic_next: AtomicBool,
    failing_regions: Mutex<HashSet<(MediaType, String)>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl StubGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            round: AtomicUsize::new(0),
            panic_next: AtomicBool::new(false),
            failing_regions: Mutex::new(HashSet::new()),
            gate: Mutex::new(None),
        })
    }

    /// Number of `fetch_category` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Change the data returned by subsequent calls.
    pub fn set_round(&self, round: usize) {
        self.round.store(round, Ordering::SeqCst);
    }

    /// Make calls for `media_type` in `region` fail.
    pub fn fail(&self, media_type: MediaType, region: &str) {
        self.failing_regions
            .lock()
            .insert((media_type, region.to_string()));
    }

    /// Make the next call panic instead of answering.
    pub fn panic_once(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.failing_regions.lock().clear();
    }

    /// Hold every subsequent call until the returned [`Notify`] is signalled
    /// with `notify_waiters`.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.notify_waiters();
        }
    }

    /// What a call with these arguments answers in `round`.
    pub fn expected(
        media_type: MediaType,
        providers: &[String],
        region: &str,
        round: usize,
    ) -> Vec<Meta> {
        let tag = format!("{}-{}-{region}-r{round}", media_type, providers.join("+"));
        vec![
            Meta::new(format!("tt{round}001"), media_type, format!("{tag}-a"))
                .with_poster(format!("https://images.example/{tag}-a.jpg")),
            Meta::new(format!("tt{round}002"), media_type, format!("{tag}-b")),
        ]
    }
}

#[async_trait]
impl CatalogGateway for StubGateway {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch_category(
        &self,
        media_type: MediaType,
        providers: &[String],
        region: &str,
    ) -> anyhow::Result<Vec<Meta>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let round = self.round.load(Ordering::SeqCst);

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("stub gateway panic for {media_type} in {region}");
        }

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self
            .failing_regions
            .lock()
            .contains(&(media_type, region.to_string()))
        {
            anyhow::bail!("stub failure for {media_type} in {region}");
        }

        Ok(Self::expected(media_type, providers, region, round))
    }
}

/// Test harness wrapping a coordinator backed by a [`StubGateway`].
pub struct TestHarness {
    pub gateway: Arc<StubGateway>,
    pub coordinator: CatalogCoordinator,
    pub ctx: AppContext,
}

impl TestHarness {
    /// Default buckets, nothing fetched yet.
    pub fn new() -> Self {
        Self::with_buckets(default_buckets())
    }

    pub fn with_buckets(buckets: Vec<BucketSpec>) -> Self {
        let gateway = StubGateway::new();
        let coordinator = CatalogCoordinator::new(gateway.clone(), buckets.clone());

        let mut config = Config::default();
        config.catalog.buckets = buckets;

        let ctx = AppContext {
            coordinator: coordinator.clone(),
            config: Arc::new(config),
        };

        Self {
            gateway,
            coordinator,
            ctx,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let addr = harness.serve().await;
        (harness, addr)
    }

    /// Serve this harness's context on a random port.
    pub async fn serve(&self) -> SocketAddr {
        let app = create_router(self.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}
