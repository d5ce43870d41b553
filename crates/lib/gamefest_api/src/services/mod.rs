//! Business logic between handlers and the stores.

pub mod auth;
pub mod cookies;
pub mod teams;
pub mod users;
