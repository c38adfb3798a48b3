//! User entity (database row mapping, coordination subset).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the users table.
///
/// Only the columns the delivery core reads; account management and auth
/// live in another service.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub user_id: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub line_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
