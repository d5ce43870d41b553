//! # gamefest_core
//!
//! Core domain logic for Gamefest: models, validation, session tokens,
//! roles and the storage adapters.

pub mod auth;
pub mod id;
pub mod migrate;
pub mod models;
pub mod store;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
