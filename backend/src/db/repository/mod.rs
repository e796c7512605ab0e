//! Repository traits for abstracting database operations.
//!
//! The traits define every statement the HTTP surface needs, allowing the
//! Postgres implementation and the in-memory one to be swapped by injection.
//!
//! Each method maps to exactly one SQL statement on the Postgres backend.
//! Mutations report the number of affected rows; zero is never an error.

use async_trait::async_trait;

use crate::models::{
    CourseResult, Customer, CustomerId, CustomerUpdate, NewCustomer, ResultKey, UserId,
};

mod error;

pub use error::{ErrorContext, ErrorKind, RepositoryError, RepositoryResult};

/// Operations on the `customers` table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single instance can be shared
/// by all request handlers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All customers, ordered by id.
    async fn list_customers(&self) -> RepositoryResult<Vec<Customer>>;

    /// Insert a customer and return the stored row with its generated id.
    async fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer>;

    /// Fetch one customer.
    ///
    /// # Returns
    /// * `Ok(None)` - no row has this id; absence is not an error
    async fn get_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;

    /// Overwrite every mutable column of the customer with `id`.
    async fn update_customer(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> RepositoryResult<u64>;

    /// Delete the customer with `id`.
    async fn delete_customer(&self, id: CustomerId) -> RepositoryResult<u64>;
}

/// Operations on the `results` table.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// All results, or only those of `user_id` when given.
    ///
    /// The filter is always passed as a bound parameter.
    async fn list_results(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<CourseResult>>;

    /// Insert a result. Duplicate keys are accepted.
    async fn create_result(&self, result: &CourseResult) -> RepositoryResult<()>;

    /// Set `score` on every row matching `key`.
    async fn update_result_score(&self, key: ResultKey, score: f64) -> RepositoryResult<u64>;

    /// Delete every row matching `key`.
    async fn delete_results(&self, key: ResultKey) -> RepositoryResult<u64>;
}

/// Everything the HTTP layer needs from storage.
pub trait FullRepository: CustomerRepository + ResultRepository {}

impl<T> FullRepository for T where T: CustomerRepository + ResultRepository {}
