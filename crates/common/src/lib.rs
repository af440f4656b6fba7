//! Shared utilities, configuration, and error handling for Parley
//!
//! This crate provides common functionality used across the Parley application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Custom axum extractors (pagination, validated JSON)

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
