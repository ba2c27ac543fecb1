//! Repository for the `projects` table.

use sqlx::{PgPool, Postgres, Transaction};
use waymark_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use waymark_core::project::{self, ProjectStatus};
use waymark_core::types::DbId;

use crate::models::place::NewPlace;
use crate::models::project::{
    CreateProject, Project, ProjectFilter, ProjectWithCounts, ProjectWithPlaces, UpdateProject,
};
use crate::repositories::PlaceRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, start_date, status, created_at, updated_at, completed_at";

/// Outcome of a checked project deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The project and all its places were removed.
    Deleted,
    /// No project with the given id exists.
    NotFound,
    /// Deletion refused: at least one owned place is visited.
    HasVisitedPlaces,
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project together with its initial places, all within one
    /// transaction. Places must already be resolved against the catalog.
    ///
    /// New projects always start `active`; initial places are unvisited, so
    /// no status recomputation is needed here.
    pub async fn create_with_places(
        pool: &PgPool,
        input: &CreateProject,
        places: &[NewPlace],
    ) -> Result<ProjectWithPlaces, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO projects (name, description, start_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&insert_query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .fetch_one(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(places.len());
        for place in places {
            created.push(PlaceRepo::insert_inner(&mut tx, project.id, place).await?);
        }

        tx.commit().await?;
        Ok(ProjectWithPlaces {
            project,
            places: created,
        })
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID with its full place collection inline, ordered
    /// by creation sequence.
    pub async fn find_with_places(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectWithPlaces>, sqlx::Error> {
        let project = Self::find_by_id(pool, id).await?;
        match project {
            Some(project) => {
                let places = PlaceRepo::list_all_by_project(pool, project.id).await?;
                Ok(Some(ProjectWithPlaces { project, places }))
            }
            None => Ok(None),
        }
    }

    /// List projects, newest first, annotated with read-time place counts.
    ///
    /// Supports an optional status filter and clamped limit/offset
    /// pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectWithCounts>, sqlx::Error> {
        let mut param_idx = 0;
        let where_clause = if filter.status.is_some() {
            param_idx += 1;
            format!("WHERE p.status = ${param_idx}")
        } else {
            String::new()
        };

        let limit_val = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset_val = clamp_offset(filter.offset);
        param_idx += 1;
        let limit_idx = param_idx;
        param_idx += 1;
        let offset_idx = param_idx;

        let query = format!(
            "SELECT p.id, p.name, p.description, p.start_date, p.status, \
                    p.created_at, p.updated_at, p.completed_at, \
                    COUNT(pl.id) AS places_count, \
                    COUNT(pl.id) FILTER (WHERE pl.visited) AS visited_count \
             FROM projects p \
             LEFT JOIN project_places pl ON pl.project_id = p.id \
             {where_clause} \
             GROUP BY p.id \
             ORDER BY p.id DESC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut q = sqlx::query_as::<_, ProjectWithCounts>(&query);
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        q.bind(limit_val).bind(offset_val).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// the derived status is never touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project unless it has visited places.
    ///
    /// The visited-count guard and the delete run in one transaction;
    /// the FK cascade removes all owned places.
    pub async fn delete_if_unvisited(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let (visited,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_places WHERE project_id = $1 AND visited",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if visited > 0 {
            return Ok(DeleteOutcome::HasVisitedPlaces);
        }

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-derive a project's status from its current place counts, inside
    /// the caller's transaction.
    ///
    /// Always touches `updated_at`: recomputation counts as an update even
    /// when the status does not change. A missing project is a no-op (it was
    /// deleted concurrently).
    pub async fn recompute_status(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let (total, visited): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE visited)
             FROM project_places WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&mut **tx)
        .await?;

        let row: Option<(String, Option<waymark_core::types::Timestamp>)> =
            sqlx::query_as("SELECT status, completed_at FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&mut **tx)
                .await?;
        let Some((status, completed_at)) = row else {
            return Ok(());
        };

        let current =
            ProjectStatus::from_str_value(&status).map_err(|e| sqlx::Error::Decode(e.into()))?;
        let update =
            project::recompute_status(total, visited, current, completed_at, chrono::Utc::now());

        sqlx::query(
            "UPDATE projects SET status = $2, completed_at = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(project_id)
        .bind(update.status.as_str())
        .bind(update.completed_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
