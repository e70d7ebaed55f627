use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A city on file. Created lazily the first time a listing address resolves
/// to it, never by a direct user action. `state` and `region` are stored as
/// empty strings so the composite uniqueness key stays total.
#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}
