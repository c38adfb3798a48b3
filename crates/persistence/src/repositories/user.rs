//! User repository for database operations (coordination subset).

use sqlx::PgPool;

use crate::entities::UserEntity;

/// Repository for the user lookups the delivery core needs.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by its business id.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, user_id, name, latitude, longitude, line_id, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
