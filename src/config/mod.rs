//! Environment-driven configuration.
//!
//! Each submodule owns one concern and exposes a `from_env()` constructor;
//! `dotenvy` loads `.env` before any of these run.

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
