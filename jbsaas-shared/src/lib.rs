//! # JBSAAS Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the JBSAAS API server and notification worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and session utilities
//! - `oauth`: Social platform OAuth2 handshake (state tokens, PKCE)
//! - `db`: Connection pool and migration helpers
//! - `retry`: Bounded exponential-backoff retry policy
//! - `scheduling`: Posting-slot suggestion heuristic
//! - `compliance`: AHPRA/ABN registration validation

pub mod auth;
pub mod compliance;
pub mod db;
pub mod models;
pub mod oauth;
pub mod retry;
pub mod scheduling;

/// Current version of the JBSAAS shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
