#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use waymark_api::config::ServerConfig;
use waymark_api::router::build_app_router;
use waymark_api::state::AppState;
use waymark_catalog::{ArtworkRef, CatalogResolver, Resolution};
use waymark_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        catalog_base_url: "http://catalog.invalid".to_string(),
        catalog_timeout_secs: 1,
        catalog_cache_ttl_secs: 900,
        catalog_cache_capacity: 100,
    }
}

/// In-memory catalog resolver for tests.
///
/// Ids registered via [`with_artwork`](Self::with_artwork) resolve; ids
/// registered via [`with_unavailable`](Self::with_unavailable) simulate an
/// upstream outage; everything else is a definitive not-found.
#[derive(Default)]
pub struct FakeCatalog {
    artworks: HashMap<DbId, Option<String>>,
    unavailable: HashSet<DbId>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artwork(mut self, external_id: DbId, title: Option<&str>) -> Self {
        self.artworks.insert(external_id, title.map(str::to_string));
        self
    }

    pub fn with_unavailable(mut self, external_id: DbId) -> Self {
        self.unavailable.insert(external_id);
        self
    }
}

#[async_trait]
impl CatalogResolver for FakeCatalog {
    async fn resolve(&self, external_id: DbId) -> Resolution {
        if self.unavailable.contains(&external_id) {
            return Resolution::Unavailable;
        }
        match self.artworks.get(&external_id) {
            Some(title) => Resolution::Found(ArtworkRef {
                external_id,
                title: title.clone(),
            }),
            None => Resolution::NotFound,
        }
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and catalog fake.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool, catalog: FakeCatalog) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        catalog: Arc::new(catalog),
    };
    build_app_router(state, &config)
}

/// Issue a bodyless request and parse the JSON response (if any).
pub async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

/// Issue a JSON request and parse the JSON response (if any).
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
