//! Entity models and DTOs.

pub mod place;
pub mod project;
