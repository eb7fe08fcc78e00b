//! Test utilities for Backoffice services.
//!
//! Import from `[dev-dependencies]` only, never in production code.

pub mod auth;
