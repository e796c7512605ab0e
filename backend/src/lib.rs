//! # CRM Backend
//!
//! CRUD HTTP backend for customers and their course results.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types and strongly typed identifiers
//! - [`db`]: Repository pattern, storage backends, configuration and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Storage backends
//!
//! - `local-repo` (default): in-memory repository for development and tests
//! - `postgres-repo`: PostgreSQL through Diesel with an r2d2 connection pool

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
