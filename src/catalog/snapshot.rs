//! Bucket configuration and immutable catalog snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streamcat_common::{MediaType, Meta};

/// One configured slice of the catalog, fetched for every media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Short key used in catalog URLs (e.g. `"nfx"`).
    pub key: String,
    /// Human-readable name advertised in the manifest.
    pub name: String,
    /// Upstream provider package keys, in the order they are sent upstream.
    pub providers: Vec<String>,
    /// Two-letter region the lineup is fetched for.
    pub region: String,
}

impl BucketSpec {
    pub fn new(key: &str, name: &str, providers: &[&str], region: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            providers: providers.iter().map(|p| p.to_string()).collect(),
            region: region.to_string(),
        }
    }
}

type Buckets = HashMap<String, Arc<Vec<Meta>>>;

/// One complete generation of cached catalog data.
///
/// A snapshot is never modified after construction. Every bucket in it was
/// produced by the same refresh cycle.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    generation: u64,
    refreshed_at: Option<DateTime<Utc>>,
    buckets: HashMap<MediaType, Buckets>,
}

impl CatalogSnapshot {
    /// The startup snapshot: generation 0, every configured bucket present and
    /// empty.
    pub fn empty(specs: &[BucketSpec]) -> Self {
        let buckets = MediaType::ALL
            .into_iter()
            .map(|media_type| {
                let per_type = specs
                    .iter()
                    .map(|spec| (spec.key.clone(), Arc::new(Vec::new())))
                    .collect();
                (media_type, per_type)
            })
            .collect();

        Self {
            generation: 0,
            refreshed_at: None,
            buckets,
        }
    }

    /// Assemble a snapshot from the results of one refresh cycle.
    pub fn from_results<I>(generation: u64, results: I) -> Self
    where
        I: IntoIterator<Item = (MediaType, String, Vec<Meta>)>,
    {
        let mut buckets: HashMap<MediaType, Buckets> = HashMap::new();
        for (media_type, key, metas) in results {
            buckets
                .entry(media_type)
                .or_default()
                .insert(key, Arc::new(metas));
        }

        Self {
            generation,
            refreshed_at: Some(Utc::now()),
            buckets,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the cycle that produced this snapshot completed. `None` for the
    /// startup snapshot.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Entries of one bucket, or `None` if the key is not part of this snapshot.
    pub fn get(&self, media_type: MediaType, key: &str) -> Option<&Arc<Vec<Meta>>> {
        self.buckets.get(&media_type)?.get(key)
    }

    /// Number of `(media type, bucket)` slots held.
    pub fn bucket_count(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    /// Total entries across all buckets.
    pub fn item_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(HashMap::values)
            .map(|metas| metas.len())
            .sum()
    }
}
