//! High-level database service functions.
//!
//! Repository-agnostic operations used by the HTTP handlers. Each function
//! validates its input, logs the call and delegates to exactly one
//! repository method. Errors carry the operation name in their context.

use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    CourseResult, Customer, CustomerId, CustomerUpdate, NewCustomer, ResultKey, UserId,
};

/// Check whether the storage backend is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check()
        .await
        .map_err(|e| e.with_operation("health_check"))
}

/// Fetch every customer, ordered by id.
pub async fn list_customers<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Customer>> {
    let customers = repo
        .list_customers()
        .await
        .map_err(|e| e.with_operation("list_customers"))?;
    debug!("Listed {} customers", customers.len());
    Ok(customers)
}

/// Validate and store a new customer.
///
/// The stored row starts with zero completed courses.
pub async fn create_customer<R: FullRepository + ?Sized>(
    repo: &R,
    customer: &NewCustomer,
) -> RepositoryResult<Customer> {
    const OP: &str = "create_customer";
    require_text(OP, "first_name", &customer.first_name)?;
    require_text(OP, "last_name", &customer.last_name)?;
    require_text(OP, "email", &customer.email)?;

    let created = repo
        .create_customer(customer)
        .await
        .map_err(|e| e.with_operation(OP))?;
    info!("Created customer {}", created.id);
    Ok(created)
}

/// Fetch one customer; `None` when no row has this id.
pub async fn get_customer<R: FullRepository + ?Sized>(
    repo: &R,
    id: CustomerId,
) -> RepositoryResult<Option<Customer>> {
    repo.get_customer(id)
        .await
        .map_err(|e| e.with_operation("get_customer"))
}

/// Overwrite every mutable field of a customer.
///
/// Returns the number of rows changed. Zero is not an error.
pub async fn update_customer<R: FullRepository + ?Sized>(
    repo: &R,
    id: CustomerId,
    update: &CustomerUpdate,
) -> RepositoryResult<u64> {
    const OP: &str = "update_customer";
    require_text(OP, "first_name", &update.first_name)?;
    require_text(OP, "last_name", &update.last_name)?;
    require_text(OP, "email", &update.email)?;
    if update.number_courses_completed < 0 {
        return Err(validation_error(
            OP,
            "number_courses_completed must not be negative",
        ));
    }

    let affected = repo
        .update_customer(id, update)
        .await
        .map_err(|e| e.with_operation(OP))?;
    if affected == 0 {
        warn!("Update matched no customer with id {}", id);
    } else {
        info!("Updated customer {}", id);
    }
    Ok(affected)
}

/// Remove a customer. Deleting a missing id succeeds with zero rows.
pub async fn delete_customer<R: FullRepository + ?Sized>(
    repo: &R,
    id: CustomerId,
) -> RepositoryResult<u64> {
    let affected = repo
        .delete_customer(id)
        .await
        .map_err(|e| e.with_operation("delete_customer"))?;
    info!("Deleted customer {} ({} rows)", id, affected);
    Ok(affected)
}

/// Fetch every result, or only those belonging to `user_id`.
pub async fn list_results<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: Option<UserId>,
) -> RepositoryResult<Vec<CourseResult>> {
    let results = repo
        .list_results(user_id)
        .await
        .map_err(|e| e.with_operation("list_results"))?;
    match user_id {
        Some(user_id) => debug!("Listed {} results for user {}", results.len(), user_id),
        None => debug!("Listed {} results", results.len()),
    }
    Ok(results)
}

/// Store a result. Duplicate keys are allowed.
pub async fn create_result<R: FullRepository + ?Sized>(
    repo: &R,
    result: &CourseResult,
) -> RepositoryResult<()> {
    const OP: &str = "create_result";
    require_finite(OP, result.score)?;

    repo.create_result(result)
        .await
        .map_err(|e| e.with_operation(OP))?;
    info!(
        "Created result for user {} in course {}",
        result.user_id, result.course_id
    );
    Ok(())
}

/// Set the score on every result matching `key`.
pub async fn update_result_score<R: FullRepository + ?Sized>(
    repo: &R,
    key: ResultKey,
    score: f64,
) -> RepositoryResult<u64> {
    const OP: &str = "update_result";
    require_finite(OP, score)?;

    let affected = repo
        .update_result_score(key, score)
        .await
        .map_err(|e| e.with_operation(OP))?;
    info!(
        "Updated {} results for user {} in course {}",
        affected, key.user_id, key.course_id
    );
    Ok(affected)
}

/// Remove every result matching `key`.
pub async fn delete_results<R: FullRepository + ?Sized>(
    repo: &R,
    key: ResultKey,
) -> RepositoryResult<u64> {
    let affected = repo
        .delete_results(key)
        .await
        .map_err(|e| e.with_operation("delete_result"))?;
    info!(
        "Deleted {} results for user {} in course {}",
        affected, key.user_id, key.course_id
    );
    Ok(affected)
}

fn require_text(operation: &str, field: &str, value: &str) -> RepositoryResult<()> {
    if value.trim().is_empty() {
        return Err(validation_error(operation, format!("{} is required", field)));
    }
    Ok(())
}

fn require_finite(operation: &str, score: f64) -> RepositoryResult<()> {
    if !score.is_finite() {
        return Err(validation_error(operation, "score must be a finite number"));
    }
    Ok(())
}

fn validation_error(operation: &str, message: impl Into<String>) -> RepositoryError {
    let message = message.into();
    warn!("Rejected {}: {}", operation, message);
    RepositoryError::validation(message).with_operation(operation)
}
