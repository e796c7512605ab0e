//! Data Transfer Objects for the HTTP API.
//!
//! Every endpoint has an explicit request and response schema. Request
//! bodies reject unknown shapes at the extractor; responses mirror the JSON
//! contract consumed by the frontend.

use serde::{Deserialize, Serialize};

use crate::models::{
    CourseId, CourseResult, Customer, CustomerUpdate, NewCustomer, ResultKey, UserId,
};

/// Request body for `POST /customers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(req: CreateCustomerRequest) -> Self {
        NewCustomer {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        }
    }
}

/// Request body for `PATCH /customer/{id}`. All fields are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_courses_completed: i32,
}

impl From<UpdateCustomerRequest> for CustomerUpdate {
    fn from(req: UpdateCustomerRequest) -> Self {
        CustomerUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            number_courses_completed: req.number_courses_completed,
        }
    }
}

/// Request body for `POST /results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResultRequest {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub score: f64,
}

impl From<CreateResultRequest> for CourseResult {
    fn from(req: CreateResultRequest) -> Self {
        CourseResult {
            user_id: req.user_id,
            course_id: req.course_id,
            score: req.score,
        }
    }
}

/// Request body for `PATCH /result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResultRequest {
    pub score: f64,
    pub user_id: UserId,
    pub course_id: CourseId,
}

impl UpdateResultRequest {
    pub fn key(&self) -> ResultKey {
        ResultKey::new(self.user_id, self.course_id)
    }
}

/// Request body for `DELETE /result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResultRequest {
    pub course_id: CourseId,
    pub user_id: UserId,
}

impl DeleteResultRequest {
    pub fn key(&self) -> ResultKey {
        ResultKey::new(self.user_id, self.course_id)
    }
}

/// Query string for `GET /results`.
///
/// `userId` stays a string here so that a malformed value reaches the
/// handler and is rejected with the API's own error shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Response for `GET /customers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomersResponse {
    pub customers: Vec<Customer>,
}

/// Response for `GET /customer/{id}`.
///
/// The `customer` key is omitted entirely when no row matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

/// Response for `GET /results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub results: Vec<CourseResult>,
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Database connection status
    pub database: String,
}
