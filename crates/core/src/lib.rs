//! Domain logic for the waymark travel-project service.
//!
//! This crate is deliberately free of database and HTTP dependencies:
//! status derivation, visited-flag transitions, and request validation are
//! all pure functions evaluated against data the caller has already loaded.

pub mod error;
pub mod pagination;
pub mod project;
pub mod types;
