//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one (verb, resource) pair and delegates to
//! the service layer in [`crate::db::services`].

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{
    CreateCustomerRequest, CreateResultRequest, CustomerResponse, CustomersResponse,
    DeleteResultRequest, HealthResponse, MessageResponse, ResultsQuery, ResultsResponse,
    UpdateCustomerRequest, UpdateResultRequest,
};
use super::error::AppError;
use super::extract::{JsonBody, PathParam, QueryParams};
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{CourseResult, CustomerId, UserId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers answering with a non-default status.
pub type StatusResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Index & Health
// =============================================================================

const ENDPOINTS: &str = "\
Customers:
  GET    /customers
  POST   /customers        {first_name, last_name, email}
  GET    /customer/{id}
  PATCH  /customer/{id}    {first_name, last_name, email, number_courses_completed}
  DELETE /customer/{id}

Results:
  GET    /results?userId=
  POST   /results          {user_id, course_id, score}
  PATCH  /result           {score, user_id, course_id}
  DELETE /result           {course_id, user_id}
";

/// GET /
///
/// Plain-text listing of the available endpoints.
pub async fn index() -> &'static str {
    ENDPOINTS
}

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            format!("error: {}", e.public_summary())
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Customers
// =============================================================================

/// GET /customers
pub async fn list_customers(State(state): State<AppState>) -> StatusResult<CustomersResponse> {
    let customers = db_services::list_customers(state.repository.as_ref()).await?;
    Ok((StatusCode::ACCEPTED, Json(CustomersResponse { customers })))
}

/// POST /customers
pub async fn create_customer(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateCustomerRequest>,
) -> StatusResult<MessageResponse> {
    db_services::create_customer(state.repository.as_ref(), &req.into()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Customer Created")),
    ))
}

/// GET /customer/{id}
///
/// A missing customer is not an error: the response simply has no
/// `customer` key.
pub async fn get_customer(
    State(state): State<AppState>,
    PathParam(id): PathParam<CustomerId>,
) -> HandlerResult<CustomerResponse> {
    let customer = db_services::get_customer(state.repository.as_ref(), id).await?;
    Ok(Json(CustomerResponse { customer }))
}

/// PATCH /customer/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    PathParam(id): PathParam<CustomerId>,
    JsonBody(req): JsonBody<UpdateCustomerRequest>,
) -> HandlerResult<MessageResponse> {
    db_services::update_customer(state.repository.as_ref(), id, &req.into()).await?;
    Ok(Json(MessageResponse::new(format!("updated customer {}", id))))
}

/// DELETE /customer/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    PathParam(id): PathParam<CustomerId>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_customer(state.repository.as_ref(), id).await?;
    Ok(Json(MessageResponse::new("deleted")))
}

// =============================================================================
// Results
// =============================================================================

/// GET /results?userId=
///
/// An absent or empty `userId` lists every result. Anything else must be
/// an integer.
pub async fn list_results(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ResultsQuery>,
) -> StatusResult<ResultsResponse> {
    let user_id = parse_user_filter(query.user_id.as_deref())?;
    let results = db_services::list_results(state.repository.as_ref(), user_id).await?;
    Ok((StatusCode::ACCEPTED, Json(ResultsResponse { results })))
}

/// POST /results
pub async fn create_result(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateResultRequest>,
) -> StatusResult<MessageResponse> {
    let result = CourseResult::from(req);
    db_services::create_result(state.repository.as_ref(), &result).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Result Created")),
    ))
}

/// PATCH /result
pub async fn update_result(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateResultRequest>,
) -> HandlerResult<MessageResponse> {
    db_services::update_result_score(state.repository.as_ref(), req.key(), req.score).await?;
    Ok(Json(MessageResponse::new(format!(
        "updated course_id: {}, user_id: {}",
        req.course_id, req.user_id
    ))))
}

/// DELETE /result
pub async fn delete_result(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteResultRequest>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_results(state.repository.as_ref(), req.key()).await?;
    Ok(Json(MessageResponse::new(format!(
        "deleted record with course_id: {}, USER_ID: {}",
        req.course_id, req.user_id
    ))))
}

fn parse_user_filter(raw: Option<&str>) -> Result<Option<UserId>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<UserId>()
            .map(Some)
            .map_err(|_| {
                AppError::BadRequest(format!("userId must be an integer, got '{}'", value))
            }),
    }
}
