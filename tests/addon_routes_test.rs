//! HTTP integration tests for the addon routes.
//!
//! Each test starts the router on a random port backed by a [`StubGateway`]
//! and talks to it with `reqwest`.

mod common;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::{StubGateway, TestHarness};
use serde_json::Value;
use streamcat_common::MediaType;

const CACHE_CONTROL: &str =
    "max-age=86400, stale-while-revalidate=86400, stale-if-error=86400, public";

fn providers(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

async fn get_json(url: String) -> (reqwest::StatusCode, reqwest::header::HeaderMap, Value) {
    let resp = reqwest::get(&url).await.expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.json().await.expect("body is not JSON");
    (status, headers, body)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_snapshot_generation() {
    let (harness, addr) = TestHarness::with_server().await;

    let (status, _, json) = get_json(format!("http://{addr}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["catalog"]["generation"], 0);
    assert!(json["catalog"]["refreshed_at"].is_null());

    harness.coordinator.refresh_cycle().await;

    let (_, _, json) = get_json(format!("http://{addr}/health")).await;
    assert_eq!(json["catalog"]["generation"], 1);
    assert_eq!(json["catalog"]["items"], 12);
    assert!(json["catalog"]["refreshed_at"].is_string());
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manifest_lists_buckets_in_order() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, headers, json) = get_json(format!("http://{addr}/manifest.json")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["cache-control"], CACHE_CONTROL);
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    assert_eq!(json["id"], "net.appsvc.streamcategory");
    assert_eq!(json["resources"], serde_json::json!(["catalog"]));
    assert_eq!(json["idPrefixes"], serde_json::json!(["tt"]));

    let catalogs: Vec<(String, String, String)> = json["catalogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap().to_string(),
                c["type"].as_str().unwrap().to_string(),
                c["name"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    let expected: Vec<(String, String, String)> = [
        ("trend", "movie", "Trending"),
        ("trend", "series", "Trending"),
        ("nfx", "movie", "Netflix"),
        ("nfx", "series", "Netflix"),
        ("lin", "movie", "Line"),
        ("lin", "series", "Line"),
    ]
    .iter()
    .map(|(a, b, c)| (a.to_string(), b.to_string(), c.to_string()))
    .collect();

    assert_eq!(catalogs, expected);
}

#[tokio::test]
async fn configured_manifest_matches_plain_manifest() {
    let (_harness, addr) = TestHarness::with_server().await;
    let segment = URL_SAFE_NO_PAD.encode(br#"{"rpdbKey":"t0-free-rpdb"}"#);

    let (_, _, plain) = get_json(format!("http://{addr}/manifest.json")).await;
    let (status, headers, configured) =
        get_json(format!("http://{addr}/{segment}/manifest.json")).await;

    assert_eq!(status, 200);
    assert_eq!(headers["cache-control"], CACHE_CONTROL);
    assert_eq!(plain, configured);
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_serves_cached_bucket() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (status, headers, json) = get_json(format!("http://{addr}/catalog/movie/nfx.json")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["cache-control"], CACHE_CONTROL);
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let expected = StubGateway::expected(MediaType::Movie, &providers(&["nfx"]), "US", 0);
    assert_eq!(json["metas"], serde_json::to_value(&expected).unwrap());
}

#[tokio::test]
async fn catalog_series_maps_to_show() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (_, _, json) = get_json(format!("http://{addr}/catalog/series/lin.json")).await;

    let expected = StubGateway::expected(
        MediaType::Show,
        &providers(&["nfx", "atp", "lin"]),
        "JP",
        0,
    );
    assert_eq!(json["metas"], serde_json::to_value(&expected).unwrap());
    assert_eq!(json["metas"][0]["type"], "series");
}

#[tokio::test]
async fn catalog_before_first_refresh_is_empty() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, _, json) = get_json(format!("http://{addr}/catalog/movie/trend.json")).await;
    assert_eq!(status, 200);
    assert_eq!(json, serde_json::json!({ "metas": [] }));
}

#[tokio::test]
async fn unknown_bucket_is_empty() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (status, headers, json) =
        get_json(format!("http://{addr}/catalog/movie/unknown.json")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["cache-control"], CACHE_CONTROL);
    assert_eq!(json, serde_json::json!({ "metas": [] }));
}

#[tokio::test]
async fn unknown_type_is_explicitly_empty() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    for url in [
        format!("http://{addr}/catalog/channel/nfx.json"),
        format!("http://{addr}/catalog/MOVIE/nfx.json"),
        format!("http://{addr}/someconfig/catalog/tv/nfx.json"),
    ] {
        let (status, headers, json) = get_json(url).await;
        assert_eq!(status, 200);
        assert_eq!(headers["cache-control"], CACHE_CONTROL);
        assert_eq!(json, serde_json::json!({ "metas": [] }));
    }
}

#[tokio::test]
async fn configuration_segment_named_catalog_routes_as_unconfigured() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (status, headers, json) =
        get_json(format!("http://{addr}/catalog/catalog/movie/nfx.json")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["cache-control"], CACHE_CONTROL);
    assert_eq!(json, serde_json::json!({ "metas": [] }));
}

#[tokio::test]
async fn extra_segment_is_ignored() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (_, _, plain) = get_json(format!("http://{addr}/catalog/movie/trend.json")).await;
    let (status, _, paged) =
        get_json(format!("http://{addr}/catalog/movie/trend/skip=100.json")).await;

    assert_eq!(status, 200);
    assert_eq!(plain, paged);
    assert_eq!(paged["metas"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn configured_catalog_without_poster_key_matches_plain() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;

    let (_, _, plain) = get_json(format!("http://{addr}/catalog/series/trend.json")).await;
    let (status, _, configured) =
        get_json(format!("http://{addr}/not-a-config/catalog/series/trend.json")).await;

    assert_eq!(status, 200);
    assert_eq!(plain, configured);
}

#[tokio::test]
async fn configured_catalog_substitutes_posters() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;
    let segment = URL_SAFE_NO_PAD.encode(br#"{"rpdbKey":"t0-free-rpdb"}"#);

    for url in [
        format!("http://{addr}/{segment}/catalog/movie/nfx.json"),
        format!("http://{addr}/{segment}/catalog/movie/nfx/skip=0.json"),
    ] {
        let (status, headers, json) = get_json(url).await;
        assert_eq!(status, 200);
        assert_eq!(headers["cache-control"], CACHE_CONTROL);

        let metas = json["metas"].as_array().unwrap();
        assert_eq!(metas.len(), 2);
        for meta in metas {
            let id = meta["id"].as_str().unwrap();
            assert_eq!(
                meta["poster"],
                format!(
                    "https://api.ratingposterdb.com/t0-free-rpdb/imdb/poster-default/{id}.jpg?fallback=true"
                )
            );
        }
    }

    // The cached snapshot itself is untouched.
    let cached = harness.coordinator.lookup(MediaType::Movie, "nfx");
    assert_eq!(
        cached[0].poster.as_deref(),
        Some("https://images.example/movie-nfx-US-r0-a.jpg")
    );
}

#[tokio::test]
async fn failed_refresh_keeps_serving_previous_data() {
    let (harness, addr) = TestHarness::with_server().await;
    harness.coordinator.refresh_cycle().await;
    let (_, _, before) = get_json(format!("http://{addr}/catalog/movie/trend.json")).await;

    harness.gateway.set_round(1);
    harness.gateway.fail(MediaType::Show, "JP");
    harness.coordinator.refresh_cycle().await;

    let (status, _, after) = get_json(format!("http://{addr}/catalog/movie/trend.json")).await;
    assert_eq!(status, 200);
    assert_eq!(before, after);
}
