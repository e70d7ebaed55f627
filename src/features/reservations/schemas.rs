use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::reservations::models::Reservation;

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReservationIn {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ReservationUpdateIn {
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
pub struct ReservationOut {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationOut {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            user_id: reservation.user_id,
            listing_id: reservation.listing_id,
            checkin: reservation.checkin,
            checkout: reservation.checkout,
            confirmed: reservation.confirmed,
            created_at: reservation.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ReservationsResponse {
    pub reservations: Vec<ReservationOut>,
}
