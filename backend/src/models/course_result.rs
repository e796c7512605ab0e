use serde::{Deserialize, Serialize};

crate::define_id_type! {
    /// Owner of a result. Not checked against `customers.id`.
    i32, UserId
}
crate::define_id_type!(i32, CourseId);

/// A row of the `results` table: one score of one user on one course.
///
/// Rows have no identity of their own. Several rows may share the same
/// (`user_id`, `course_id`) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub score: f64,
}

/// Composite key addressing every result row of a user on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultKey {
    pub user_id: UserId,
    pub course_id: CourseId,
}

impl ResultKey {
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self { user_id, course_id }
    }

    pub fn matches(&self, result: &CourseResult) -> bool {
        result.user_id == self.user_id && result.course_id == self.course_id
    }
}

impl CourseResult {
    pub fn key(&self) -> ResultKey {
        ResultKey::new(self.user_id, self.course_id)
    }
}
