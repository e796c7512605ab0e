use serde::{Deserialize, Serialize};

crate::define_id_type! {
    /// `customers.id`, assigned by the database.
    i32, CustomerId
}

/// A row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_courses_completed: i32,
}

/// Fields accepted when registering a customer.
///
/// `number_courses_completed` is not part of creation; the column default applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Full overwrite of every mutable customer column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_courses_completed: i32,
}

impl Customer {
    /// Build the stored record for a freshly inserted customer.
    pub fn from_new(id: CustomerId, new: &NewCustomer) -> Self {
        Self {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            number_courses_completed: 0,
        }
    }

    /// Overwrite all mutable fields, keeping the id.
    pub fn apply(&mut self, update: &CustomerUpdate) {
        self.first_name = update.first_name.clone();
        self.last_name = update.last_name.clone();
        self.email = update.email.clone();
        self.number_courses_completed = update.number_courses_completed;
    }
}
