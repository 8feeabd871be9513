//! # Rolodex Shared Library
//!
//! Types and infrastructure shared between the Rolodex API server and any
//! future binaries (batch imports, admin tooling).
//!
//! ## Module Organization
//!
//! - `models`: Database models (`User`, `Contact`) and their CRUD operations
//! - `auth`: Password hashing, JWT issue/verify, and bearer-token middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Rolodex shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
