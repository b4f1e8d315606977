// Reservation repository implementation

use super::queries::reservation_queries;
use super::validate_limit;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::Reservation;
use tracing::instrument;

/// Repository for reservation lookups
#[derive(Clone)]
pub struct ReservationRepository {
    pool: DbPool,
}

impl ReservationRepository {
    /// Create a new ReservationRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Up to `limit` reservations belonging to `guest_id`, earliest stay first
    #[instrument(skip(self))]
    pub async fn find_by_guest(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        validate_limit(limit)?;

        let query = format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE guest_id = $1
            ORDER BY start_date, id
            LIMIT $2
            "#,
            reservation_queries::SELECT_ALL_COLUMNS
        );

        let reservations = sqlx::query_as::<_, Reservation>(&query)
            .bind(guest_id)
            .bind(limit)
            .fetch_all(self.pool.pool())
            .await?;

        tracing::debug!(count = reservations.len(), "Found reservations for guest");
        Ok(reservations)
    }
}
