//! Domain types shared by the repository and HTTP layers.

pub mod macros;

mod course_result;
mod customer;

pub use course_result::{CourseId, CourseResult, ResultKey, UserId};
pub use customer::{Customer, CustomerId, CustomerUpdate, NewCustomer};
