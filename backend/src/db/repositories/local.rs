//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository traits
//! suitable for unit testing and local development. Rows live in memory,
//! giving fast, deterministic and isolated execution with the same
//! observable semantics as the Postgres backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::{
    CustomerRepository, RepositoryError, RepositoryResult, ResultRepository,
};
use crate::models::{
    CourseResult, Customer, CustomerId, CustomerUpdate, NewCustomer, ResultKey, UserId,
};

/// In-memory local repository.
///
/// Cloning shares the underlying storage, so a clone handed to the HTTP
/// state observes writes made through the original.
///
/// # Example
/// ```
/// use crm_backend::db::repositories::LocalRepository;
/// use crm_backend::db::repository::CustomerRepository;
/// use crm_backend::models::NewCustomer;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// repo.create_customer(&NewCustomer {
///     first_name: "Ada".into(),
///     last_name: "Lovelace".into(),
///     email: "ada@x.com".into(),
/// })
/// .await
/// .unwrap();
/// assert_eq!(repo.customer_count(), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    customers: BTreeMap<CustomerId, Customer>,
    // Insertion order; no key is unique.
    results: Vec<CourseResult>,
    next_customer_id: CustomerId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            customers: BTreeMap::new(),
            results: Vec::new(),
            next_customer_id: CustomerId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, `health_check` reports `false` and every other
    /// operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of customers stored.
    pub fn customer_count(&self) -> usize {
        self.data.read().customers.len()
    }

    /// Get the number of result rows stored.
    pub fn result_count(&self) -> usize {
        self.data.read().results.len()
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("local repository is marked unhealthy")
                .with_operation(operation))
        }
    }
}

#[async_trait]
impl CustomerRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_customers(&self) -> RepositoryResult<Vec<Customer>> {
        self.ensure_healthy("list_customers")?;
        Ok(self.data.read().customers.values().cloned().collect())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer> {
        self.ensure_healthy("create_customer")?;
        let mut data = self.data.write();
        let id = data.next_customer_id;
        data.next_customer_id = CustomerId(id.0 + 1);

        let stored = Customer::from_new(id, customer);
        data.customers.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        self.ensure_healthy("get_customer")?;
        Ok(self.data.read().customers.get(&id).cloned())
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> RepositoryResult<u64> {
        self.ensure_healthy("update_customer")?;
        match self.data.write().customers.get_mut(&id) {
            Some(customer) => {
                customer.apply(update);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_customer(&self, id: CustomerId) -> RepositoryResult<u64> {
        self.ensure_healthy("delete_customer")?;
        Ok(self.data.write().customers.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl ResultRepository for LocalRepository {
    async fn list_results(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<CourseResult>> {
        self.ensure_healthy("list_results")?;
        let data = self.data.read();
        Ok(data
            .results
            .iter()
            .filter(|r| user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect())
    }

    async fn create_result(&self, result: &CourseResult) -> RepositoryResult<()> {
        self.ensure_healthy("create_result")?;
        self.data.write().results.push(result.clone());
        Ok(())
    }

    async fn update_result_score(&self, key: ResultKey, score: f64) -> RepositoryResult<u64> {
        self.ensure_healthy("update_result_score")?;
        let mut data = self.data.write();
        let mut updated = 0;
        for result in data.results.iter_mut().filter(|r| key.matches(r)) {
            result.score = score;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_results(&self, key: ResultKey) -> RepositoryResult<u64> {
        self.ensure_healthy("delete_results")?;
        let mut data = self.data.write();
        let before = data.results.len();
        data.results.retain(|r| !key.matches(r));
        Ok((before - data.results.len()) as u64)
    }
}
