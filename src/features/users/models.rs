use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. The password column holds a bcrypt hash and is
/// never serialized; reads go out through `UserOut`/`ProfileOut`.
#[derive(FromRow, Deserialize, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
