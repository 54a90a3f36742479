//! Addon protocol routes: manifest and catalogs.
//!
//! Every catalog URL shape, with or without a leading configuration segment
//! and with or without a trailing extra segment, resolves through the same
//! handler. Unknown types and buckets answer `{"metas": []}`.
//!
//! A configuration segment spelled literally `catalog` is routed as the
//! unconfigured shape, so `/catalog/catalog/movie/nfx.json` looks up type
//! `catalog` and answers empty. Real segments are JSON or base64 and never
//! collide.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use streamcat_common::{MediaType, Meta};

use super::manifest::build_manifest;
use super::user_config::UserConfig;
use crate::gateway::transform_posters;
use crate::server::AppContext;

pub const CACHE_CONTROL: &str =
    "max-age=86400, stale-while-revalidate=86400, stale-if-error=86400, public";

pub fn addon_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/manifest.json", get(manifest))
        .route("/:configuration/manifest.json", get(configured_manifest))
        .route("/catalog/:type/:bucket", get(catalog))
        .route("/catalog/:type/:bucket/:extra", get(catalog))
        .route("/:configuration/catalog/:type/:bucket", get(catalog))
        .route("/:configuration/catalog/:type/:bucket/:extra", get(catalog))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let snapshot = ctx.coordinator.snapshot();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": {
            "generation": snapshot.generation(),
            "refreshed_at": snapshot.refreshed_at(),
            "refreshing": ctx.coordinator.is_refreshing(),
            "items": snapshot.item_count(),
        }
    }))
}

/// Attach the addon cache policy to a JSON body.
fn cached_json<T: Serialize>(body: T) -> Response {
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL),
    );
    response
}

async fn manifest(State(ctx): State<AppContext>) -> Response {
    cached_json(build_manifest(ctx.coordinator.buckets()))
}

async fn configured_manifest(
    State(ctx): State<AppContext>,
    Path(configuration): Path<String>,
) -> Response {
    let user = UserConfig::from_segment(&configuration);
    tracing::debug!(posters = user.poster_key().is_some(), "Configured manifest");
    cached_json(build_manifest(ctx.coordinator.buckets()))
}

#[derive(Debug, Deserialize)]
struct CatalogPath {
    configuration: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    bucket: String,
}

#[derive(Serialize)]
struct CatalogResponse<'a> {
    metas: Cow<'a, [Meta]>,
}

async fn catalog(State(ctx): State<AppContext>, Path(path): Path<CatalogPath>) -> Response {
    let Some(media_type) = MediaType::from_presentation(&path.kind) else {
        tracing::debug!(kind = %path.kind, "Unknown catalog type, answering empty");
        return cached_json(CatalogResponse {
            metas: Cow::Borrowed(&[]),
        });
    };

    let bucket = path.bucket.strip_suffix(".json").unwrap_or(&path.bucket);
    let metas = ctx.coordinator.lookup(media_type, bucket);

    let poster_key = path
        .configuration
        .as_deref()
        .map(UserConfig::from_segment)
        .and_then(|user| user.poster_key().map(str::to_owned));

    match poster_key {
        Some(key) => cached_json(CatalogResponse {
            metas: Cow::Owned(transform_posters(&key, &metas)),
        }),
        None => cached_json(CatalogResponse {
            metas: Cow::Borrowed(metas.as_slice()),
        }),
    }
}
