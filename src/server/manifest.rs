//! Addon manifest.
//!
//! The catalog list is derived from the configured buckets so that every
//! advertised catalog resolves to a cached bucket.

use serde::Serialize;
use streamcat_common::MediaType;

use crate::catalog::BucketSpec;

pub const ADDON_ID: &str = "net.appsvc.streamcategory";
const ADDON_NAME: &str = "Streaming Catalogs(中文)";
const ADDON_DESCRIPTION: &str = "美剧/日剧榜单";
const ADDON_LOGO: &str = "https://play-lh.googleusercontent.com/TBRwjS_qfJCSj1m7zZB93FnpJM5fSpMA_wUlFDLxWAb45T9RmwBvQd5cWR5viJJOhkI";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub logo: &'static str,
    pub catalogs: Vec<CatalogEntry>,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub id_prefixes: Vec<&'static str>,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

/// One `movie` then one `series` entry per bucket, in bucket order.
pub fn catalog_entries(buckets: &[BucketSpec]) -> Vec<CatalogEntry> {
    buckets
        .iter()
        .flat_map(|bucket| {
            MediaType::ALL.into_iter().map(move |media_type| CatalogEntry {
                id: bucket.key.clone(),
                kind: media_type.presentation_name(),
                name: bucket.name.clone(),
            })
        })
        .collect()
}

pub fn build_manifest(buckets: &[BucketSpec]) -> Manifest {
    Manifest {
        id: ADDON_ID,
        version: env!("CARGO_PKG_VERSION"),
        name: ADDON_NAME,
        description: ADDON_DESCRIPTION,
        logo: ADDON_LOGO,
        catalogs: catalog_entries(buckets),
        resources: vec!["catalog"],
        types: vec!["series", "movie"],
        id_prefixes: vec!["tt"],
        behavior_hints: BehaviorHints {
            configurable: true,
            configuration_required: false,
        },
    }
}
