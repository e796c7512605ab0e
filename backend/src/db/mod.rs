//! Database module for customer and course-result storage.
//!
//! This module provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Required-field validation                            │
//! │  - Operation logging                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │                               │
//! ┌───▼──────────────┐   ┌────────────▼─────┐
//! │ Postgres (Diesel)│   │ Local (in-memory)│
//! └──────────────────┘   └──────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use crm_backend::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::discover().await?;
//!     let customers = services::list_customers(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use config::{DbConfig, PostgresConfig};
pub use repo_config::RepositoryConfig;

pub use services::{
    create_customer, create_result, delete_customer, delete_results, get_customer, health_check,
    list_customers, list_results, update_customer, update_result_score,
};

pub use factory::{RepositoryFactory, RepositorySelection, RepositoryType};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    CustomerRepository, ErrorContext, ErrorKind, FullRepository, RepositoryError, RepositoryResult,
    ResultRepository,
};
