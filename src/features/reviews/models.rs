use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A guest review. `user_name` is denormalized at write time so listing
/// pages render without a join against users.
#[derive(FromRow, Debug)]
pub struct Review {
    pub id: Uuid,
    pub author_id: Uuid,
    pub listing_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub body: String,
    pub user_name: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
