//! Project and place domain rules.
//!
//! Provides the status derivation ("a project is completed exactly when it
//! has at least one place and every place is visited"), the visited-flag
//! transition rule, and validation helpers for project/place input. All
//! functions here are pure; callers pass in counts and current state loaded
//! from the database.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Project lifecycle status values (stored as text in `projects.status`).
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

/// All valid project status strings.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_COMPLETED];

/// Project name length bounds, in characters.
pub const MIN_NAME_CHARS: usize = 1;
pub const MAX_NAME_CHARS: usize = 200;

/// Bounds on the initial places array of a bulk create.
pub const MIN_PLACES_PER_PROJECT: usize = 1;
/// Hard cap on places per project, enforced on bulk create and on every
/// incremental add.
pub const MAX_PLACES_PER_PROJECT: i64 = 10;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            _ => Err(format!(
                "Invalid project status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
        }
    }
}

/// The derived status of a project after recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ProjectStatus,
    pub completed_at: Option<Timestamp>,
}

/// Derive a project's status from its place counts.
///
/// A project is `completed` exactly when it has at least one place and every
/// place is visited. `completed_at` is set to `now` only on the transition
/// into `completed` and cleared only on the transition out; recomputing a
/// project that is already in the derived state leaves the timestamp alone.
///
/// Callers must persist the result together with a touch of `updated_at`:
/// recomputation always counts as an update, even when nothing changes.
pub fn recompute_status(
    total: i64,
    visited: i64,
    current: ProjectStatus,
    completed_at: Option<Timestamp>,
    now: Timestamp,
) -> StatusUpdate {
    if total > 0 && total == visited {
        StatusUpdate {
            status: ProjectStatus::Completed,
            completed_at: if current == ProjectStatus::Completed {
                completed_at
            } else {
                Some(now)
            },
        }
    } else {
        StatusUpdate {
            status: ProjectStatus::Active,
            completed_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Visited transitions
// ---------------------------------------------------------------------------

/// A place's visited flag together with its transition timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitedState {
    pub visited: bool,
    pub visited_at: Option<Timestamp>,
}

/// Apply a requested visited-flag change to the current state.
///
/// `visited_at` is set exactly when the flag goes false -> true and cleared
/// exactly when it goes true -> false. A request that leaves the flag in its
/// current state (or `None`, meaning "no change") is a no-op and does not
/// touch the timestamp.
pub fn next_visited_state(
    current: VisitedState,
    requested: Option<bool>,
    now: Timestamp,
) -> VisitedState {
    match requested {
        Some(true) if !current.visited => VisitedState {
            visited: true,
            visited_at: Some(now),
        },
        Some(false) if current.visited => VisitedState {
            visited: false,
            visited_at: None,
        },
        _ => current,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a project name: 1-200 characters.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    let chars = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        return Err(CoreError::Unprocessable(format!(
            "name must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Validate the length of the initial places array of a bulk create.
pub fn validate_initial_places_len(len: usize) -> Result<(), CoreError> {
    if !(MIN_PLACES_PER_PROJECT..=MAX_PLACES_PER_PROJECT as usize).contains(&len) {
        return Err(CoreError::Unprocessable(format!(
            "places must be between {MIN_PLACES_PER_PROJECT} and {MAX_PLACES_PER_PROJECT}"
        )));
    }
    Ok(())
}

/// External catalog ids are positive integers.
pub fn validate_external_id(external_id: DbId) -> Result<(), CoreError> {
    if external_id <= 0 {
        return Err(CoreError::Unprocessable(format!(
            "external_id must be a positive integer, got {external_id}"
        )));
    }
    Ok(())
}

/// Find the first external id that appears more than once in a request
/// array. Returns `None` when all ids are distinct.
pub fn find_duplicate_external_id(external_ids: &[DbId]) -> Option<DbId> {
    let mut seen = HashSet::with_capacity(external_ids.len());
    external_ids.iter().copied().find(|id| !seen.insert(*id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
