//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against the schema in
//! `backend/sql/schema.sql`. The server never creates or alters tables.
//!
//! ## Features
//!
//! - Connection pooling with r2d2 (pool defaults, connections validated on checkout)
//! - Every statement built with the Diesel DSL, so all values are bound parameters
//! - Blocking Diesel calls run on the Tokio blocking pool
//!
//! ## Configuration
//!
//! See [`PostgresConfig`]: `DATABASE_URL`, or the discrete `POSTGRES_*` variables.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use std::fmt;
use tokio::task;

use crate::db::config::PostgresConfig;
use crate::db::repository::{
    CustomerRepository, RepositoryError, RepositoryResult, ResultRepository,
};
use crate::models::{
    CourseResult, Customer, CustomerId, CustomerUpdate, NewCustomer, ResultKey, UserId,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and open the connection pool.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot reach the database
    pub fn new(config: &PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_operation("create_pool")
            })?;

        Ok(Self { pool })
    }

    /// Number of open and idle pooled connections.
    pub fn pool_state(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.connections, state.idle_connections)
    }

    /// Run one database operation on a pooled connection, off the async executor.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, diesel::result::Error> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
            f(&mut conn).map_err(|e| RepositoryError::from(e).with_operation(operation))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .with_operation(operation)
                .with_details("spawn_blocking")
        })?
    }
}

impl fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (connections, idle) = self.pool_state();
        f.debug_struct("PostgresRepository")
            .field("connections", &connections)
            .field("idle_connections", &idle)
            .finish()
    }
}

#[async_trait]
impl CustomerRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn).map(|_| true)
        })
        .await
    }

    async fn list_customers(&self) -> RepositoryResult<Vec<Customer>> {
        let rows = self
            .with_conn("list_customers", |conn| {
                customers::table
                    .select(CustomerRow::as_select())
                    .order(customers::id.asc())
                    .load::<CustomerRow>(conn)
            })
            .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> RepositoryResult<Customer> {
        let row = NewCustomerRow {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
        };

        let inserted = self
            .with_conn("create_customer", move |conn| {
                diesel::insert_into(customers::table)
                    .values(&row)
                    .returning(CustomerRow::as_returning())
                    .get_result::<CustomerRow>(conn)
            })
            .await?;

        Ok(inserted.into())
    }

    async fn get_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        let row = self
            .with_conn("get_customer", move |conn| {
                customers::table
                    .filter(customers::id.eq(id.value()))
                    .select(CustomerRow::as_select())
                    .first::<CustomerRow>(conn)
                    .optional()
            })
            .await
            .map_err(|e| e.with_entity("customer", id))?;

        Ok(row.map(Customer::from))
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> RepositoryResult<u64> {
        let changeset = CustomerChangeset::from(update);

        let updated = self
            .with_conn("update_customer", move |conn| {
                diesel::update(customers::table.filter(customers::id.eq(id.value())))
                    .set(&changeset)
                    .execute(conn)
            })
            .await
            .map_err(|e| e.with_entity("customer", id))?;

        Ok(updated as u64)
    }

    async fn delete_customer(&self, id: CustomerId) -> RepositoryResult<u64> {
        let deleted = self
            .with_conn("delete_customer", move |conn| {
                diesel::delete(customers::table.filter(customers::id.eq(id.value()))).execute(conn)
            })
            .await
            .map_err(|e| e.with_entity("customer", id))?;

        Ok(deleted as u64)
    }
}

#[async_trait]
impl ResultRepository for PostgresRepository {
    async fn list_results(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<CourseResult>> {
        let rows = self
            .with_conn("list_results", move |conn| {
                let mut query = results::table.select(ResultRow::as_select()).into_boxed();
                if let Some(user_id) = user_id {
                    query = query.filter(results::user_id.eq(user_id.value()));
                }
                query.load::<ResultRow>(conn)
            })
            .await?;

        Ok(rows.into_iter().map(CourseResult::from).collect())
    }

    async fn create_result(&self, result: &CourseResult) -> RepositoryResult<()> {
        let row = ResultRow::from(result);

        self.with_conn("create_result", move |conn| {
            diesel::insert_into(results::table)
                .values(&row)
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn update_result_score(&self, key: ResultKey, score: f64) -> RepositoryResult<u64> {
        let updated = self
            .with_conn("update_result_score", move |conn| {
                diesel::update(
                    results::table
                        .filter(results::user_id.eq(key.user_id.value()))
                        .filter(results::course_id.eq(key.course_id.value())),
                )
                .set(results::score.eq(score))
                .execute(conn)
            })
            .await?;

        Ok(updated as u64)
    }

    async fn delete_results(&self, key: ResultKey) -> RepositoryResult<u64> {
        let deleted = self
            .with_conn("delete_results", move |conn| {
                diesel::delete(
                    results::table
                        .filter(results::user_id.eq(key.user_id.value()))
                        .filter(results::course_id.eq(key.course_id.value())),
                )
                .execute(conn)
            })
            .await?;

        Ok(deleted as u64)
    }
}
