use diesel::prelude::*;

use super::schema::{customers, results};
use crate::models::{CourseId, CourseResult, Customer, CustomerId, CustomerUpdate, UserId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_courses_completed: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
pub struct CustomerChangeset {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_courses_completed: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResultRow {
    pub user_id: i32,
    pub course_id: i32,
    pub score: f64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            number_courses_completed: row.number_courses_completed,
        }
    }
}

impl From<&CustomerUpdate> for CustomerChangeset {
    fn from(update: &CustomerUpdate) -> Self {
        Self {
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            email: update.email.clone(),
            number_courses_completed: update.number_courses_completed,
        }
    }
}

impl From<ResultRow> for CourseResult {
    fn from(row: ResultRow) -> Self {
        Self {
            user_id: UserId(row.user_id),
            course_id: CourseId(row.course_id),
            score: row.score,
        }
    }
}

impl From<&CourseResult> for ResultRow {
    fn from(result: &CourseResult) -> Self {
        Self {
            user_id: result.user_id.value(),
            course_id: result.course_id.value(),
            score: result.score,
        }
    }
}
