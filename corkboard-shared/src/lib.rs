//! # Corkboard Shared Library
//!
//! This crate contains the domain logic shared by the Corkboard API server:
//! entity models, the position-ordering protocol, and board access control.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, workspaces, boards, lists, cards,
//!   labels, join rows) and the board aggregate loader
//! - `ordering`: Position allocator and the reorder/reparent engine
//! - `auth`: Board access control and identity-provider integration
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod ordering;

/// Current version of the Corkboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
