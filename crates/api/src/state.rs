use std::sync::Arc;

use waymark_catalog::CatalogResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waymark_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External catalog lookup (trait object so tests can inject a fake).
    pub catalog: Arc<dyn CatalogResolver>,
}
