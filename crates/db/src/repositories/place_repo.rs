//! Repository for the `project_places` table.

use sqlx::{PgPool, Postgres, Transaction};
use waymark_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use waymark_core::project::{next_visited_state, VisitedState};
use waymark_core::types::DbId;

use crate::models::place::{NewPlace, Place, PlaceFilter, UpdatePlace};
use crate::repositories::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, external_id, title, notes, visited, visited_at, created_at, updated_at";

/// Provides CRUD operations for places within a project.
pub struct PlaceRepo;

impl PlaceRepo {
    /// Insert a resolved place inside the caller's transaction.
    ///
    /// New places are always unvisited. A duplicate external id within the
    /// project surfaces as a unique-constraint violation
    /// (`uq_project_places_external_id`).
    pub async fn insert_inner(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        place: &NewPlace,
    ) -> Result<Place, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_places (project_id, external_id, title, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(project_id)
            .bind(place.external_id)
            .bind(&place.title)
            .bind(&place.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Append a resolved place to an existing project and re-derive the
    /// project's status, all in one transaction.
    ///
    /// Capacity and duplicate pre-checks live with the caller; the unique
    /// constraint still backs the duplicate check if concurrent adds race
    /// past it.
    pub async fn add_to_project(
        pool: &PgPool,
        project_id: DbId,
        place: &NewPlace,
    ) -> Result<Place, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::insert_inner(&mut tx, project_id, place).await?;
        ProjectRepo::recompute_status(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Count a project's places: `(total, visited)`.
    pub async fn counts(pool: &PgPool, project_id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE visited)
             FROM project_places WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// Whether the project already holds a place with this external id.
    pub async fn exists_external_id(
        pool: &PgPool,
        project_id: DbId,
        external_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM project_places WHERE project_id = $1 AND external_id = $2",
        )
        .bind(project_id)
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// List a project's places in creation order, with an optional visited
    /// filter and clamped limit/offset pagination.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &PlaceFilter,
    ) -> Result<Vec<Place>, sqlx::Error> {
        let mut param_idx = 1;
        let mut conditions = vec!["project_id = $1".to_string()];
        if filter.visited.is_some() {
            param_idx += 1;
            conditions.push(format!("visited = ${param_idx}"));
        }

        let limit_val = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset_val = clamp_offset(filter.offset);
        param_idx += 1;
        let limit_idx = param_idx;
        param_idx += 1;
        let offset_idx = param_idx;

        let query = format!(
            "SELECT {COLUMNS} FROM project_places WHERE {} \
             ORDER BY id ASC LIMIT ${limit_idx} OFFSET ${offset_idx}",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, Place>(&query).bind(project_id);
        if let Some(visited) = filter.visited {
            q = q.bind(visited);
        }
        q.bind(limit_val).bind(offset_val).fetch_all(pool).await
    }

    /// All places of a project in creation order (detail responses).
    pub async fn list_all_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Place>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_places WHERE project_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Place>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a place by ID, scoped to its project.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        place_id: DbId,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_places WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Place>(&query)
            .bind(place_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a place's notes and/or visited flag, then re-derive
    /// the owning project's status, all in one transaction.
    ///
    /// Visited transitions follow the timestamp rule: `visited_at` is set
    /// only on false -> true, cleared only on true -> false, untouched on
    /// redundant writes.
    ///
    /// Returns `None` if the place does not exist in this project.
    pub async fn update_in_project(
        pool: &PgPool,
        project_id: DbId,
        place_id: DbId,
        input: &UpdatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_query =
            format!("SELECT {COLUMNS} FROM project_places WHERE id = $1 AND project_id = $2");
        let place: Option<Place> = sqlx::query_as(&select_query)
            .bind(place_id)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(place) = place else {
            return Ok(None);
        };

        let next = next_visited_state(
            VisitedState {
                visited: place.visited,
                visited_at: place.visited_at,
            },
            input.visited,
            chrono::Utc::now(),
        );

        let update_query = format!(
            "UPDATE project_places SET
                notes = COALESCE($3, notes),
                visited = $4,
                visited_at = $5,
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Place>(&update_query)
            .bind(place_id)
            .bind(project_id)
            .bind(&input.notes)
            .bind(next.visited)
            .bind(next.visited_at)
            .fetch_one(&mut *tx)
            .await?;

        ProjectRepo::recompute_status(&mut tx, project_id).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
