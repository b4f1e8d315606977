// Repository layer for database operations

pub mod property;
pub mod queries;
pub mod reservation;
pub mod user;

pub use property::{build_search_query, PropertyRepository, SearchQuery};
pub use reservation::ReservationRepository;
pub use user::UserRepository;

use crate::errors::ValidationError;

/// Default row cap for list operations
pub const DEFAULT_LIMIT: i64 = 10;

/// Reject limits that would return nothing or make LIMIT invalid
pub(crate) fn validate_limit(limit: i64) -> Result<(), ValidationError> {
    if limit < 1 {
        return Err(ValidationError::invalid(
            "limit",
            format!("must be at least 1, got {}", limit),
        ));
    }
    Ok(())
}
