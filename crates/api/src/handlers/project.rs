//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use waymark_core::error::CoreError;
use waymark_core::project::{
    find_duplicate_external_id, validate_external_id, validate_initial_places_len,
    validate_project_name, ProjectStatus,
};
use waymark_core::types::DbId;
use waymark_db::models::place::NewPlace;
use waymark_db::models::project::{
    CreateProject, Project, ProjectFilter, ProjectWithCounts, ProjectWithPlaces, UpdateProject,
};
use waymark_db::repositories::{DeleteOutcome, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Creates a project, optionally with an initial places array. Every
/// requested place must resolve against the catalog before anything is
/// persisted; one unresolvable id aborts the whole request.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectWithPlaces>)> {
    validate_project_name(&input.name)?;

    let mut resolved: Vec<NewPlace> = Vec::new();
    if let Some(ref places) = input.places {
        validate_initial_places_len(places.len())?;

        let external_ids: Vec<DbId> = places.iter().map(|p| p.external_id).collect();
        if let Some(dup) = find_duplicate_external_id(&external_ids) {
            return Err(CoreError::Conflict(format!(
                "duplicate external_id {dup} in places array"
            ))
            .into());
        }

        for place in places {
            validate_external_id(place.external_id)?;
            let artwork = state
                .catalog
                .resolve(place.external_id)
                .await
                .into_artwork()
                .ok_or_else(|| {
                    CoreError::Unprocessable(format!(
                        "external_id {} not found in catalog (or temporarily unavailable)",
                        place.external_id
                    ))
                })?;
            resolved.push(NewPlace {
                external_id: place.external_id,
                title: artwork.title,
                notes: place.notes.clone(),
            });
        }
    }

    let created = ProjectRepo::create_with_places(&state.pool, &input, &resolved).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects
///
/// Lists projects newest first, annotated with read-time place counts.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<Vec<ProjectWithCounts>>> {
    if let Some(ref status) = filter.status {
        ProjectStatus::from_str_value(status).map_err(CoreError::Unprocessable)?;
    }
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithPlaces>> {
    let project = ProjectRepo::find_with_places(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{id}
///
/// Partial update of name, description, and start date. Status is derived
/// and never updated here.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(ref name) = input.name {
        validate_project_name(name)?;
    }
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Refused with a conflict while the project has visited places; otherwise
/// the delete cascades to all owned places.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    match ProjectRepo::delete_if_unvisited(&state.pool, id).await? {
        DeleteOutcome::Deleted => Ok(StatusCode::NO_CONTENT),
        DeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        })),
        DeleteOutcome::HasVisitedPlaces => Err(AppError::Core(CoreError::Conflict(
            "project cannot be deleted because it has visited places".to_string(),
        ))),
    }
}
