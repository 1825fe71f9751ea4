//! # Taskhive Shared Library
//!
//! This crate contains the domain model and infrastructure seams used by the
//! Taskhive API server: project/task/note documents, account and one-time
//! token types, the storage abstraction with its in-memory and Postgres
//! backends, password hashing and session tokens, and outbound email.
//!
//! ## Module Organization
//!
//! - `models`: Domain documents and their behavior
//! - `store`: The `Store` trait plus `MemStore` and `PgStore` backends
//! - `auth`: Password hashing, session tokens, authorization guards
//! - `mail`: The `Mailer` trait plus SMTP, log, and recording implementations

pub mod auth;
pub mod mail;
pub mod models;
pub mod store;

/// Current version of the Taskhive shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
