//! HTTP handler functions, one module per resource.

pub mod place;
pub mod project;
