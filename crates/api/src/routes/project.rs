//! Route definitions for the `/projects` resource.
//!
//! Also nests place routes under `/projects/{project_id}/places`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{place, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PATCH  /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{project_id}/places               -> list_by_project
/// POST   /{project_id}/places               -> create
/// GET    /{project_id}/places/{id}          -> get_by_id
/// PATCH  /{project_id}/places/{id}          -> update
/// ```
pub fn router() -> Router<AppState> {
    let place_routes = Router::new()
        .route("/", get(place::list_by_project).post(place::create))
        .route("/{id}", get(place::get_by_id).patch(place::update));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/places", place_routes)
}
