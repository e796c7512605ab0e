// Mirrors backend/sql/schema.sql.

diesel::table! {
    customers (id) {
        id -> Int4,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        number_courses_completed -> Int4,
    }
}

// `results` has no key in the database; Diesel requires one to be declared.
diesel::table! {
    results (user_id, course_id) {
        user_id -> Int4,
        course_id -> Int4,
        score -> Float8,
    }
}

diesel::allow_tables_to_appear_in_same_query!(customers, results);
