//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waymark_core::types::{DbId, Timestamp};

use crate::models::place::{CreatePlace, Place};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Derived lifecycle status, `active` or `completed`.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// A project annotated with read-time place counts.
///
/// The counts are computed per query and never stored, so they cannot drift
/// from the place rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub places_count: i64,
    pub visited_count: i64,
}

/// A project with its full place collection inline (detail responses).
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithPlaces {
    #[serde(flatten)]
    pub project: Project,
    pub places: Vec<Place>,
}

/// DTO for creating a new project, optionally with initial places.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub places: Option<Vec<CreatePlace>>,
}

/// DTO for updating an existing project. All fields are optional; status is
/// derived and never updated directly.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// Filter and pagination for project listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
