//! Place entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

/// A place row from the `project_places` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub id: DbId,
    pub project_id: DbId,
    /// External catalog artwork id.
    pub external_id: DbId,
    /// Title resolved from the catalog at creation time.
    pub title: Option<String>,
    pub notes: Option<String>,
    pub visited: bool,
    pub visited_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for requesting a place, before catalog resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlace {
    pub external_id: DbId,
    pub notes: Option<String>,
}

/// A place ready for insertion: external id already resolved, title pinned.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub external_id: DbId,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// DTO for a partial place update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlace {
    pub notes: Option<String>,
    pub visited: Option<bool>,
}

/// Filter and pagination for place listing within a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceFilter {
    pub visited: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
