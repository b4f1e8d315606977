// SQL query constants for repositories
// Column lists are spelled out so extra schema columns never leak into row decoding.

/// SQL query fragments for users table
pub mod user_queries {
    pub const SELECT_ALL_COLUMNS: &str = "id, name, email, password";
}

/// SQL query fragments for properties table
pub mod property_queries {
    /// Columns qualified with the table name, safe to use under a JOIN
    pub const SELECT_ALL_COLUMNS: &str = r#"properties.id, properties.owner_id,
        properties.title, properties.description,
        properties.thumbnail_photo_url, properties.cover_photo_url,
        properties.cost_per_night,
        properties.street, properties.city, properties.province,
        properties.post_code, properties.country,
        properties.parking_spaces, properties.number_of_bathrooms,
        properties.number_of_bedrooms"#;

    /// Mean review rating; NULL when the LEFT JOIN found no reviews
    pub const AVERAGE_RATING: &str = "avg(property_reviews.rating)::float8";
}

/// SQL query fragments for reservations table
pub mod reservation_queries {
    pub const SELECT_ALL_COLUMNS: &str = "id, guest_id, property_id, start_date, end_date";
}
