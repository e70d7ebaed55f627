use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A stay booked against a listing. `owner_id` is denormalized from the
/// listing so confirmation checks need no join.
#[derive(FromRow, Debug)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub owner_id: Uuid,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
