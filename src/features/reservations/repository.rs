use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::features::listings::repository::get_one_listing;
use crate::features::reservations::models::Reservation;
use crate::features::reservations::schemas::{ReservationIn, ReservationUpdateIn};
use crate::utilities::errors::{AppError, is_unique_violation};

/// Same-day checkin is allowed; a same-day checkout is a zero-night stay
/// and is allowed too, matching the booking form.
pub fn validate_dates(
    checkin: NaiveDate,
    checkout: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if checkin < today {
        return Err(AppError::ValidationError(
            "Checkin cannot be before today's date.".to_string(),
        ));
    }
    if checkout < checkin {
        return Err(AppError::ValidationError(
            "Checkout cannot be before checkin date.".to_string(),
        ));
    }
    Ok(())
}

/// Date rules for edits. A checkin left untouched is not re-checked
/// against today, so a stay already underway can still have its checkout
/// adjusted.
fn validate_date_change(
    original_checkin: NaiveDate,
    checkin: NaiveDate,
    checkout: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if checkin != original_checkin && checkin < today {
        return Err(AppError::ValidationError(
            "Checkin cannot be before today's date.".to_string(),
        ));
    }
    if checkout < checkin {
        return Err(AppError::ValidationError(
            "Checkout cannot be before checkin date.".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_reservation(
    pool: &PgPool,
    requester_id: &Uuid,
    listing_id: &Uuid,
    reservation_in: ReservationIn,
) -> Result<Reservation, AppError> {
    let today = Utc::now().date_naive();
    validate_dates(reservation_in.checkin, reservation_in.checkout, today)?;

    let listing = get_one_listing(pool, listing_id).await?;
    if listing.owner_id == *requester_id {
        return Err(AppError::BusinessRuleError(
            "Cannot make a reservation for your own place.".to_string(),
        ));
    }

    let insert_result = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (id, user_id, listing_id, owner_id, checkin, checkout)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(requester_id)
    .bind(listing_id)
    .bind(listing.owner_id)
    .bind(reservation_in.checkin)
    .bind(reservation_in.checkout)
    .fetch_one(pool)
    .await;

    let reservation = insert_result.map_err(|err| {
        if is_unique_violation(&err) {
            AppError::BusinessRuleError(
                "You already have a reservation for this place.".to_string(),
            )
        } else {
            AppError::SqlxError(err)
        }
    })?;

    info!(
        "created reservation {} on listing {listing_id}",
        reservation.id
    );

    Ok(reservation)
}

pub async fn get_one_reservation(
    pool: &PgPool,
    requester_id: &Uuid,
    reservation_id: &Uuid,
) -> Result<Reservation, AppError> {
    let reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Reservation not found.".to_string()))?;

    // Visible to the booker and the place owner only.
    if reservation.user_id != *requester_id && reservation.owner_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    Ok(reservation)
}

/// The calendar for a listing, owner only.
pub async fn get_reservations_for_listing(
    pool: &PgPool,
    requester_id: &Uuid,
    listing_id: &Uuid,
) -> Result<Vec<Reservation>, AppError> {
    let listing = get_one_listing(pool, listing_id).await?;
    if listing.owner_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    get_reservations_by_listing(pool, listing_id).await
}

pub async fn get_reservations_by_listing(
    pool: &PgPool,
    listing_id: &Uuid,
) -> Result<Vec<Reservation>, AppError> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE listing_id = $1 ORDER BY checkin",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_user(
    pool: &PgPool,
    user_id: &Uuid,
) -> Result<Vec<Reservation>, AppError> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE user_id = $1 ORDER BY checkin",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// One-way flag flip by the place owner. Confirming twice is a no-op.
pub async fn confirm_reservation(
    pool: &PgPool,
    requester_id: &Uuid,
    reservation_id: &Uuid,
) -> Result<Reservation, AppError> {
    let reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Reservation not found.".to_string()))?;

    if reservation.owner_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    let reservation = sqlx::query_as::<_, Reservation>(
        "UPDATE reservations SET confirmed = TRUE, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(reservation_id)
    .fetch_one(pool)
    .await?;

    Ok(reservation)
}

pub async fn update_reservation(
    pool: &PgPool,
    requester_id: &Uuid,
    reservation_id: &Uuid,
    update_in: ReservationUpdateIn,
) -> Result<Reservation, AppError> {
    let reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Reservation not found.".to_string()))?;

    if reservation.user_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    if reservation.confirmed {
        return Err(AppError::BusinessRuleError(
            "Cannot edit a confirmed reservation. Please cancel the reservation and make a new one."
                .to_string(),
        ));
    }

    let checkin = update_in.checkin.unwrap_or(reservation.checkin);
    let checkout = update_in.checkout.unwrap_or(reservation.checkout);
    let today = Utc::now().date_naive();
    validate_date_change(reservation.checkin, checkin, checkout, today)?;

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations SET checkin = $1, checkout = $2, updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(checkin)
    .bind(checkout)
    .bind(reservation_id)
    .fetch_one(pool)
    .await?;

    Ok(reservation)
}

/// Cancellation by the booker. Confirmed reservations can be cancelled.
pub async fn remove_reservation(
    pool: &PgPool,
    requester_id: &Uuid,
    reservation_id: &Uuid,
) -> Result<(), AppError> {
    let reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Reservation not found.".to_string()))?;

    if reservation.user_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    sqlx::query("DELETE FROM reservations WHERE id = $1")
        .bind(reservation_id)
        .execute(pool)
        .await?;

    info!("cancelled reservation {reservation_id}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn checkin_before_today_is_rejected() {
        let err = validate_dates(date(2026, 8, 20), date(2026, 8, 25), date(2026, 8, 21))
            .unwrap_err();
        assert_eq!(err.to_string(), "Checkin cannot be before today's date.");
    }

    #[test]
    fn checkout_before_checkin_is_rejected() {
        let err = validate_dates(date(2026, 8, 25), date(2026, 8, 24), date(2026, 8, 21))
            .unwrap_err();
        assert_eq!(err.to_string(), "Checkout cannot be before checkin date.");
    }

    #[test]
    fn same_day_checkin_is_allowed() {
        let today = date(2026, 8, 21);
        assert!(validate_dates(today, date(2026, 8, 23), today).is_ok());
    }

    #[test]
    fn same_day_checkout_is_allowed() {
        let today = date(2026, 8, 21);
        assert!(validate_dates(date(2026, 8, 25), date(2026, 8, 25), today).is_ok());
    }

    #[test]
    fn checkout_of_an_underway_stay_can_move() {
        // Checkin arrived two days ago and is left untouched.
        let checkin = date(2026, 8, 19);
        let today = date(2026, 8, 21);
        assert!(validate_date_change(checkin, checkin, date(2026, 8, 24), today).is_ok());
    }

    #[test]
    fn changed_checkin_must_not_be_in_the_past() {
        let today = date(2026, 8, 21);
        let err = validate_date_change(date(2026, 8, 25), date(2026, 8, 20), date(2026, 8, 26), today)
            .unwrap_err();
        assert_eq!(err.to_string(), "Checkin cannot be before today's date.");
    }

    #[test]
    fn edited_checkout_still_cannot_precede_checkin() {
        let checkin = date(2026, 8, 19);
        let today = date(2026, 8, 21);
        assert!(validate_date_change(checkin, checkin, date(2026, 8, 18), today).is_err());
    }
}
