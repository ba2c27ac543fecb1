//! Integration tests for the project/place repositories.
//!
//! Exercises the repository layer against a real database:
//! - All-or-nothing project creation with initial places
//! - Unique constraint on (project_id, external_id)
//! - Checked deletion (blocked by visited places) and cascade
//! - Visited transitions and status recomputation
//! - Listing with filters, counts, and pagination

use sqlx::PgPool;
use waymark_db::models::place::{NewPlace, PlaceFilter, UpdatePlace};
use waymark_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use waymark_db::repositories::{DeleteOutcome, PlaceRepo, ProjectRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        start_date: None,
        places: None,
    }
}

fn new_place(external_id: i64, title: &str) -> NewPlace {
    NewPlace {
        external_id,
        title: Some(title.to_string()),
        notes: None,
    }
}

fn visit(flag: bool) -> UpdatePlace {
    UpdatePlace {
        notes: None,
        visited: Some(flag),
    }
}

// ---------------------------------------------------------------------------
// Test: create with places
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_create_with_places(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Chicago Weekend"),
        &[new_place(100, "Nighthawks"), new_place(101, "Water Lilies")],
    )
    .await
    .unwrap();

    assert_eq!(created.project.name, "Chicago Weekend");
    assert_eq!(created.project.status, "active");
    assert_eq!(created.project.completed_at, None);
    assert_eq!(created.places.len(), 2);
    // Creation order is preserved.
    assert_eq!(created.places[0].external_id, 100);
    assert_eq!(created.places[1].external_id, 101);
    assert!(created.places.iter().all(|p| !p.visited));

    let detail = ProjectRepo::find_with_places(&pool, created.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.places.len(), 2);
    assert_eq!(detail.places[0].title.as_deref(), Some("Nighthawks"));
}

#[sqlx::test]
async fn test_create_without_places(pool: PgPool) {
    let created = ProjectRepo::create_with_places(&pool, &new_project("Empty"), &[])
        .await
        .unwrap();
    assert_eq!(created.places.len(), 0);
    assert_eq!(created.project.status, "active");
}

// ---------------------------------------------------------------------------
// Test: unique (project_id, external_id) constraint
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_duplicate_external_id_violates_constraint(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Dup Test"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();

    let err = PlaceRepo::add_to_project(&pool, created.project.id, &new_place(100, "Nighthawks"))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(
                db_err.constraint(),
                Some("uq_project_places_external_id")
            );
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    // The same external id in a different project is fine.
    let other = ProjectRepo::create_with_places(&pool, &new_project("Other"), &[])
        .await
        .unwrap();
    PlaceRepo::add_to_project(&pool, other.project.id, &new_place(100, "Nighthawks"))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: visited transitions drive project status
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_visiting_all_places_completes_project(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Art Walk"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;
    let place_id = created.places[0].id;

    let place = PlaceRepo::update_in_project(&pool, project_id, place_id, &visit(true))
        .await
        .unwrap()
        .unwrap();
    assert!(place.visited);
    assert!(place.visited_at.is_some());

    let project = ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, "completed");
    assert!(project.completed_at.is_some());
}

#[sqlx::test]
async fn test_revisiting_keeps_timestamps(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Idempotent"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;
    let place_id = created.places[0].id;

    let first = PlaceRepo::update_in_project(&pool, project_id, place_id, &visit(true))
        .await
        .unwrap()
        .unwrap();
    let completed_at = ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .unwrap()
        .completed_at;

    let second = PlaceRepo::update_in_project(&pool, project_id, place_id, &visit(true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.visited_at, first.visited_at);

    let project = ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    // Still completed, original completion timestamp preserved.
    assert_eq!(project.status, "completed");
    assert_eq!(project.completed_at, completed_at);
}

#[sqlx::test]
async fn test_unvisiting_reverts_completion(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Revert"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;
    let place_id = created.places[0].id;

    PlaceRepo::update_in_project(&pool, project_id, place_id, &visit(true))
        .await
        .unwrap();
    let place = PlaceRepo::update_in_project(&pool, project_id, place_id, &visit(false))
        .await
        .unwrap()
        .unwrap();
    assert!(!place.visited);
    assert_eq!(place.visited_at, None);

    let project = ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, "active");
    assert_eq!(project.completed_at, None);
}

#[sqlx::test]
async fn test_adding_place_reverts_completed_project(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Grows"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;

    PlaceRepo::update_in_project(&pool, project_id, created.places[0].id, &visit(true))
        .await
        .unwrap();
    assert_eq!(
        ProjectRepo::find_by_id(&pool, project_id)
            .await
            .unwrap()
            .unwrap()
            .status,
        "completed"
    );

    PlaceRepo::add_to_project(&pool, project_id, &new_place(101, "Water Lilies"))
        .await
        .unwrap();

    let project = ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, "active");
    assert_eq!(project.completed_at, None);
}

// ---------------------------------------------------------------------------
// Test: checked deletion and cascade
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_delete_cascades_to_places(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Doomed"),
        &[new_place(100, "Nighthawks"), new_place(101, "Water Lilies")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;

    let outcome = ProjectRepo::delete_if_unvisited(&pool, project_id)
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);

    assert!(ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .is_none());
    let (total, _) = PlaceRepo::counts(&pool, project_id).await.unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test]
async fn test_delete_blocked_by_visited_place(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Keeper"),
        &[new_place(100, "Nighthawks"), new_place(101, "Water Lilies")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;

    PlaceRepo::update_in_project(&pool, project_id, created.places[0].id, &visit(true))
        .await
        .unwrap();

    let outcome = ProjectRepo::delete_if_unvisited(&pool, project_id)
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::HasVisitedPlaces);

    // Nothing was removed.
    assert!(ProjectRepo::find_by_id(&pool, project_id)
        .await
        .unwrap()
        .is_some());
    let (total, visited) = PlaceRepo::counts(&pool, project_id).await.unwrap();
    assert_eq!((total, visited), (2, 1));
}

#[sqlx::test]
async fn test_delete_missing_project(pool: PgPool) {
    let outcome = ProjectRepo::delete_if_unvisited(&pool, 9999).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::NotFound);
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_list_projects_with_counts_and_filter(pool: PgPool) {
    let first = ProjectRepo::create_with_places(
        &pool,
        &new_project("First"),
        &[new_place(100, "Nighthawks")],
    )
    .await
    .unwrap();
    let second = ProjectRepo::create_with_places(
        &pool,
        &new_project("Second"),
        &[new_place(200, "A"), new_place(201, "B")],
    )
    .await
    .unwrap();

    PlaceRepo::update_in_project(&pool, first.project.id, first.places[0].id, &visit(true))
        .await
        .unwrap();

    let all = ProjectRepo::list(&pool, &ProjectFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Newest first.
    assert_eq!(all[0].project.id, second.project.id);
    assert_eq!(all[0].places_count, 2);
    assert_eq!(all[0].visited_count, 0);
    assert_eq!(all[1].places_count, 1);
    assert_eq!(all[1].visited_count, 1);

    let completed = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            status: Some("completed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].project.id, first.project.id);
}

#[sqlx::test]
async fn test_list_projects_pagination(pool: PgPool) {
    for i in 0..5 {
        ProjectRepo::create_with_places(&pool, &new_project(&format!("P{i}")), &[])
            .await
            .unwrap();
    }

    let page = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            status: None,
            limit: Some(2),
            offset: Some(1),
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].project.name, "P3");
    assert_eq!(page[1].project.name, "P2");
}

#[sqlx::test]
async fn test_list_places_filter_and_order(pool: PgPool) {
    let created = ProjectRepo::create_with_places(
        &pool,
        &new_project("Walk"),
        &[new_place(1, "A"), new_place(2, "B"), new_place(3, "C")],
    )
    .await
    .unwrap();
    let project_id = created.project.id;

    PlaceRepo::update_in_project(&pool, project_id, created.places[1].id, &visit(true))
        .await
        .unwrap();

    let all = PlaceRepo::list_by_project(&pool, project_id, &PlaceFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    // Creation order ascending.
    assert_eq!(
        all.iter().map(|p| p.external_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let visited_only = PlaceRepo::list_by_project(
        &pool,
        project_id,
        &PlaceFilter {
            visited: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(visited_only.len(), 1);
    assert_eq!(visited_only[0].external_id, 2);

    let page = PlaceRepo::list_by_project(
        &pool,
        project_id,
        &PlaceFilter {
            visited: None,
            limit: Some(1),
            offset: Some(1),
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].external_id, 2);
}

// ---------------------------------------------------------------------------
// Test: project update
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_partial_project_update(pool: PgPool) {
    let created = ProjectRepo::create_with_places(&pool, &new_project("Before"), &[])
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        created.project.id,
        &UpdateProject {
            name: Some("After".to_string()),
            description: None,
            start_date: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "After");
    // Untouched fields keep their values; status is never updated here.
    assert_eq!(updated.description, created.project.description);
    assert_eq!(updated.status, "active");

    assert!(ProjectRepo::update(
        &pool,
        9999,
        &UpdateProject {
            name: Some("Ghost".to_string()),
            description: None,
            start_date: None,
        },
    )
    .await
    .unwrap()
    .is_none());
}
