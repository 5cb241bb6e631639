//! # FocusTask Shared Library
//!
//! This crate contains the schema, data models and seed loader used to
//! populate a FocusTask SQLite database with sample data.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migration management
//! - `models`: Database models and data structures
//! - `seed`: Sample dataset, validation, loader and integrity checks

pub mod db;
pub mod models;
pub mod seed;

/// Current version of the FocusTask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
