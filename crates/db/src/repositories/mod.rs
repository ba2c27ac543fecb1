//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step writes own an
//! internal transaction so callers get all-or-nothing semantics.

pub mod place_repo;
pub mod project_repo;

pub use place_repo::PlaceRepo;
pub use project_repo::{DeleteOutcome, ProjectRepo};
