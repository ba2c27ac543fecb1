//! HTTP client for the artwork catalog API.
//!
//! Wraps `GET {base_url}/artworks/{id}` with [`reqwest`], classifying the
//! response into a [`Resolution`] and caching definitive answers (found and
//! not-found) in a bounded TTL cache. Transport failures and unexpected
//! status codes are logged and returned as `Unavailable` without caching,
//! so a flapping upstream does not poison the cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use waymark_core::types::DbId;

use crate::cache::TtlCache;
use crate::resolver::{ArtworkRef, CatalogResolver, Resolution};

/// Default base URL of the Art Institute of Chicago public API.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// Default cache time-to-live (15 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(900);

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

/// Configuration for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base HTTP URL of the catalog API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long cached lookup results stay valid.
    pub cache_ttl: Duration,
    /// Maximum number of cached lookup results.
    pub cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Errors constructing the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Production [`CatalogResolver`] backed by the catalog HTTP API.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    /// `Some` caches a found artwork, `None` caches a definitive not-found.
    cache: TtlCache<Option<ArtworkRef>>,
}

impl CatalogClient {
    /// Build a client from configuration.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
            cache: TtlCache::new(config.cache_capacity, config.cache_ttl),
        })
    }
}

#[async_trait]
impl CatalogResolver for CatalogClient {
    async fn resolve(&self, external_id: DbId) -> Resolution {
        if let Some(cached) = self.cache.get(external_id) {
            return match cached {
                Some(artwork) => Resolution::Found(artwork),
                None => Resolution::NotFound,
            };
        }

        let url = format!("{}/artworks/{}", self.base_url, external_id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(external_id, error = %err, "catalog request failed");
                return Resolution::Unavailable;
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => {
                self.cache.insert(external_id, None);
                Resolution::NotFound
            }
            StatusCode::OK => {
                let body: serde_json::Value = match response.json().await {
                    Ok(body) => body,
                    Err(err) => {
                        tracing::warn!(external_id, error = %err, "catalog returned invalid JSON");
                        return Resolution::Unavailable;
                    }
                };
                let artwork = ArtworkRef {
                    external_id,
                    title: extract_title(&body),
                };
                self.cache.insert(external_id, Some(artwork.clone()));
                Resolution::Found(artwork)
            }
            status => {
                tracing::warn!(external_id, %status, "catalog returned unexpected status");
                Resolution::Unavailable
            }
        }
    }
}

/// Pull `data.title` out of a catalog response body, if present.
///
/// Anything other than a string title (absent, null, or a non-string value)
/// yields `None`; the artwork itself is still considered resolved.
fn extract_title(body: &serde_json::Value) -> Option<String> {
    body.get("data")?
        .get("title")?
        .as_str()
        .map(str::to_string)
}
