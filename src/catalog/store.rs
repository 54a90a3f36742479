//! Process-wide holder of the current catalog snapshot.

use std::sync::Arc;

use parking_lot::RwLock;
use streamcat_common::{Error, Result};

use super::snapshot::CatalogSnapshot;

/// Holds "the current snapshot".
///
/// Readers clone the inner `Arc` and keep an immutable generation for as long
/// as they need it; the lock is only held for the duration of that clone or of
/// the pointer swap in [`publish`](Self::publish).
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(initial: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The snapshot that is current right now.
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    /// Replace the current snapshot.
    ///
    /// Fails without touching the store if `next` is not newer than the
    /// current generation.
    pub fn publish(&self, next: CatalogSnapshot) -> Result<Arc<CatalogSnapshot>> {
        let next = Arc::new(next);
        let previous = self.swap(Arc::clone(&next))?;
        // The old generation may be the last reference; free it unlocked.
        drop(previous);
        Ok(next)
    }

    /// Install `next` and hand back the generation it replaced. The write
    /// lock is released before returning.
    fn swap(&self, next: Arc<CatalogSnapshot>) -> Result<Arc<CatalogSnapshot>> {
        let mut current = self.current.write();
        if next.generation() <= current.generation() {
            return Err(Error::internal(format!(
                "refusing to publish generation {} over generation {}",
                next.generation(),
                current.generation()
            )));
        }
        Ok(std::mem::replace(&mut *current, next))
    }
}
