//! External artwork catalog lookup.
//!
//! Resolves an external catalog id to a display title over the catalog's
//! HTTP API, with a process-wide bounded TTL cache so repeated attaches of
//! the same artwork do not hammer the upstream service. The lookup is
//! exposed behind the [`CatalogResolver`] trait so the API layer can inject
//! a fake in tests.

pub mod cache;
pub mod client;
pub mod resolver;

pub use client::{CatalogClient, CatalogClientError, CatalogConfig};
pub use resolver::{ArtworkRef, CatalogResolver, Resolution};
