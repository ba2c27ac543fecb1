//! Handlers for the `/places` resource.
//!
//! Places are nested under projects:
//! `/projects/{project_id}/places[/{id}]`
//!
//! Places are never deleted directly; they go away with their project.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use waymark_core::error::CoreError;
use waymark_core::project::{validate_external_id, MAX_PLACES_PER_PROJECT};
use waymark_core::types::DbId;
use waymark_db::models::place::{CreatePlace, NewPlace, Place, PlaceFilter, UpdatePlace};
use waymark_db::repositories::{PlaceRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load the owning project or 404.
async fn require_project(state: &AppState, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}

/// POST /api/v1/projects/{project_id}/places
///
/// Appends a place to an existing project: capacity check, duplicate check,
/// catalog resolution, insert. The new place starts unvisited and the
/// project's status is re-derived (an unvisited place reverts a completed
/// project to active).
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreatePlace>,
) -> AppResult<(StatusCode, Json<Place>)> {
    require_project(&state, project_id).await?;
    validate_external_id(input.external_id)?;

    let (total, _) = PlaceRepo::counts(&state.pool, project_id).await?;
    if total >= MAX_PLACES_PER_PROJECT {
        return Err(CoreError::Conflict(format!(
            "project already has maximum {MAX_PLACES_PER_PROJECT} places"
        ))
        .into());
    }

    if PlaceRepo::exists_external_id(&state.pool, project_id, input.external_id).await? {
        return Err(CoreError::Conflict(
            "place with this external_id already in project".to_string(),
        )
        .into());
    }

    let artwork = state
        .catalog
        .resolve(input.external_id)
        .await
        .into_artwork()
        .ok_or_else(|| {
            CoreError::Unprocessable(format!(
                "external_id {} not found in catalog (or temporarily unavailable)",
                input.external_id
            ))
        })?;

    let place = PlaceRepo::add_to_project(
        &state.pool,
        project_id,
        &NewPlace {
            external_id: input.external_id,
            title: artwork.title,
            notes: input.notes,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(place)))
}

/// GET /api/v1/projects/{project_id}/places
///
/// Lists a project's places in creation order, optionally filtered by
/// visited flag.
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(filter): Query<PlaceFilter>,
) -> AppResult<Json<Vec<Place>>> {
    require_project(&state, project_id).await?;
    let places = PlaceRepo::list_by_project(&state.pool, project_id, &filter).await?;
    Ok(Json(places))
}

/// GET /api/v1/projects/{project_id}/places/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Place>> {
    require_project(&state, project_id).await?;
    let place = PlaceRepo::find_in_project(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Place", id }))?;
    Ok(Json(place))
}

/// PATCH /api/v1/projects/{project_id}/places/{id}
///
/// Partial update of notes and/or visited flag; the owning project's status
/// is re-derived afterwards in the same transaction.
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePlace>,
) -> AppResult<Json<Place>> {
    require_project(&state, project_id).await?;
    let place = PlaceRepo::update_in_project(&state.pool, project_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Place", id }))?;
    Ok(Json(place))
}
