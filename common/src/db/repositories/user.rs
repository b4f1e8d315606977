// User repository implementation

use super::queries::user_queries;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{NewUser, User};
use tracing::instrument;

/// Repository for user-related database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a user and return the stored row with its generated id
    ///
    /// The password is stored as given; hashing is the caller's job.
    /// A taken email surfaces as `DatabaseError::DuplicateKey`.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            user_queries::SELECT_ALL_COLUMNS
        );

        let created = sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .fetch_one(self.pool.pool())
            .await?;

        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    /// Find a user by email
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM users WHERE email = $1 LIMIT 1",
            user_queries::SELECT_ALL_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool.pool())
            .await?;

        tracing::debug!(found = user.is_some(), "Looked up user by email");
        Ok(user)
    }

    /// Find a user by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = $1",
            user_queries::SELECT_ALL_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(user)
    }
}
