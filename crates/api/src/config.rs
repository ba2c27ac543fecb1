use std::time::Duration;

use waymark_catalog::CatalogConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the external artwork catalog.
    pub catalog_base_url: String,
    /// Per-request timeout against the catalog, in seconds (default: `6`).
    pub catalog_timeout_secs: u64,
    /// How long catalog lookups stay cached, in seconds (default: `900`).
    pub catalog_cache_ttl_secs: u64,
    /// Maximum number of cached catalog lookups (default: `5000`).
    pub catalog_cache_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                       |
    /// |---------------------------|-------------------------------|
    /// | `HOST`                    | `0.0.0.0`                     |
    /// | `PORT`                    | `3000`                        |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                          |
    /// | `CATALOG_BASE_URL`        | `https://api.artic.edu/api/v1`|
    /// | `CATALOG_TIMEOUT_SECS`    | `6`                           |
    /// | `CATALOG_CACHE_TTL_SECS`  | `900`                         |
    /// | `CATALOG_CACHE_CAPACITY`  | `5000`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let catalog_base_url = std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| waymark_catalog::client::DEFAULT_BASE_URL.into());

        let catalog_timeout_secs: u64 = std::env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| "6".into())
            .parse()
            .expect("CATALOG_TIMEOUT_SECS must be a valid u64");

        let catalog_cache_ttl_secs: u64 = std::env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("CATALOG_CACHE_TTL_SECS must be a valid u64");

        let catalog_cache_capacity: usize = std::env::var("CATALOG_CACHE_CAPACITY")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("CATALOG_CACHE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            catalog_base_url,
            catalog_timeout_secs,
            catalog_cache_ttl_secs,
            catalog_cache_capacity,
        }
    }

    /// Catalog client configuration derived from the server config.
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog_base_url.clone(),
            timeout: Duration::from_secs(self.catalog_timeout_secs),
            cache_ttl: Duration::from_secs(self.catalog_cache_ttl_secs),
            cache_capacity: self.catalog_cache_capacity,
        }
    }
}
