//! JustWatch popularity listings over GraphQL.
//!
//! Implements [`CatalogGateway`] by posting the `GetPopularTitles` query for
//! one object type, one set of provider packages and one country.
//!
//! Features:
//! - Token-bucket rate limiting via [`governor`] (configurable, default 4 req/s).
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Configurable request timeout (default 30 seconds).
//! - Titles without an IMDb id are dropped.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use streamcat_common::{Error, MediaType, Meta};
use tracing::{debug, warn};

use super::CatalogGateway;
use crate::config::GatewayConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const IMAGE_BASE: &str = "https://images.justwatch.com";
const POSTER_PROFILE: &str = "s592";
const MAX_RETRIES: u32 = 3;

const POPULAR_TITLES_QUERY: &str = r#"
query GetPopularTitles(
  $country: Country!
  $first: Int!
  $language: Language!
  $popularTitlesFilter: TitleFilter
  $popularTitlesSortBy: PopularTitlesSorting!
) {
  popularTitles(
    country: $country
    filter: $popularTitlesFilter
    first: $first
    sortBy: $popularTitlesSortBy
  ) {
    edges {
      node {
        objectId
        objectType
        content(country: $country, language: $language) {
          title
          shortDescription
          originalReleaseYear
          posterUrl
          externalIds {
            imdbId
          }
        }
      }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// GraphQL response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PopularTitlesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopularTitlesData {
    popular_titles: TitleConnection,
}

#[derive(Debug, Deserialize)]
struct TitleConnection {
    edges: Vec<TitleEdge>,
}

#[derive(Debug, Deserialize)]
struct TitleEdge {
    node: TitleNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleNode {
    object_id: Option<u64>,
    content: Option<TitleContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleContent {
    title: Option<String>,
    short_description: Option<String>,
    original_release_year: Option<i32>,
    poster_url: Option<String>,
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExternalIds {
    imdb_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Gateway implementation
// ---------------------------------------------------------------------------

/// JustWatch catalog gateway.
///
/// # Examples
///
/// ```no_run
/// use streamcat::config::GatewayConfig;
/// use streamcat::gateway::JustWatchGateway;
///
/// let gateway = JustWatchGateway::new(&GatewayConfig::default()).unwrap();
/// ```
pub struct JustWatchGateway {
    client: reqwest::Client,
    url: String,
    language: String,
    page_size: u32,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl JustWatchGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let per_second = NonZeroU32::new(config.requests_per_second)
            .context("Gateway rate limit must be greater than 0")?;
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            client,
            url: config.url.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
            rate_limiter,
        })
    }

    /// Request body for one listing.
    fn request_body(
        &self,
        media_type: MediaType,
        providers: &[String],
        region: &str,
    ) -> serde_json::Value {
        json!({
            "operationName": "GetPopularTitles",
            "query": POPULAR_TITLES_QUERY,
            "variables": {
                "country": region,
                "language": self.language,
                "first": self.page_size,
                "popularTitlesSortBy": "TRENDING",
                "popularTitlesFilter": {
                    "objectTypes": [media_type.gateway_name()],
                    "packages": providers,
                    "ageCertifications": [],
                    "excludeGenres": [],
                    "excludeProductionCountries": [],
                    "genres": [],
                    "monetizationTypes": [],
                    "presentationTypes": [],
                    "productionCountries": [],
                    "excludeIrrelevantTitles": false,
                },
            },
        })
    }

    /// Execute a POST with rate limiting and 429-retry logic.
    async fn post(&self, body: &serde_json::Value) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .post(&self.url)
                .json(body)
                .send()
                .await
                .with_context(|| format!("JustWatch request failed: {}", self.url))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "JustWatch returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::gateway(format!("HTTP {status} from {}", self.url)).into());
            }

            return Ok(resp);
        }
    }
}

fn parse_response(text: &str) -> streamcat_common::Result<GraphQlResponse> {
    Ok(serde_json::from_str(text)?)
}

/// Resolve a poster template such as `/poster/123/{profile}/x.{format}`.
fn poster_url(template: &str) -> String {
    let path = template
        .replace("{profile}", POSTER_PROFILE)
        .replace("{format}", "jpg");
    format!("{IMAGE_BASE}{path}")
}

/// Convert one listing node into a [`Meta`], if it carries an IMDb id.
fn to_meta(node: TitleNode, media_type: MediaType) -> Option<Meta> {
    let content = node.content?;
    let imdb_id = content
        .external_ids
        .and_then(|ids| ids.imdb_id)
        .filter(|id| id.starts_with("tt"))?;

    let mut meta = Meta::new(imdb_id, media_type, content.title.unwrap_or_default());
    if let Some(poster) = content.poster_url.as_deref() {
        meta = meta.with_poster(poster_url(poster));
    }
    if let Some(description) = content.short_description {
        meta = meta.with_field("description", json!(description));
    }
    if let Some(year) = content.original_release_year {
        meta = meta.with_field("releaseInfo", json!(year.to_string()));
    }
    if let Some(object_id) = node.object_id {
        meta = meta.with_field("justwatchId", json!(object_id));
    }
    Some(meta)
}

#[async_trait]
impl CatalogGateway for JustWatchGateway {
    fn name(&self) -> &'static str {
        "justwatch"
    }

    async fn fetch_category(
        &self,
        media_type: MediaType,
        providers: &[String],
        region: &str,
    ) -> anyhow::Result<Vec<Meta>> {
        debug!(
            media_type = media_type.gateway_name(),
            providers = %providers.join(","),
            region,
            "JustWatch popular titles"
        );

        let body = self.request_body(media_type, providers, region);
        let text = self
            .post(&body)
            .await?
            .text()
            .await
            .context("failed to read JustWatch popular titles response")?;
        let response = parse_response(&text)
            .context("failed to parse JustWatch popular titles response")?;

        if let Some(first) = response.errors.first() {
            return Err(Error::gateway(format!(
                "JustWatch returned {} GraphQL error(s): {}",
                response.errors.len(),
                first.message
            ))
            .into());
        }

        let data = response
            .data
            .ok_or_else(|| Error::decode("JustWatch response contained no data"))?;

        let total = data.popular_titles.edges.len();
        let metas: Vec<Meta> = data
            .popular_titles
            .edges
            .into_iter()
            .filter_map(|edge| to_meta(edge.node, media_type))
            .collect();

        if metas.len() < total {
            debug!(
                dropped = total - metas.len(),
                "Dropped titles without an IMDb id"
            );
        }

        Ok(metas)
    }
}
