use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    features::reservations::{
        repository::{
            confirm_reservation, create_reservation, get_one_reservation,
            get_reservations_for_listing, remove_reservation, update_reservation,
        },
        schemas::{ReservationIn, ReservationOut, ReservationUpdateIn, ReservationsResponse},
    },
    services::database::Database,
    utilities::{errors::AppError, jwt::Claims},
};

pub async fn create_reservation_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
    Json(reservation_in): Json<ReservationIn>,
) -> Result<impl IntoResponse, AppError> {
    let reservation =
        create_reservation(&database.pool, &claims.sub, &listing_id, reservation_in).await?;

    Ok((StatusCode::CREATED, Json(ReservationOut::from(reservation))))
}

pub async fn get_reservations_for_listing_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservations =
        get_reservations_for_listing(&database.pool, &claims.sub, &listing_id).await?;

    Ok(Json(ReservationsResponse {
        reservations: reservations.into_iter().map(ReservationOut::from).collect(),
    }))
}

pub async fn get_one_reservation_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = get_one_reservation(&database.pool, &claims.sub, &reservation_id).await?;

    Ok(Json(ReservationOut::from(reservation)))
}

pub async fn confirm_reservation_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = confirm_reservation(&database.pool, &claims.sub, &reservation_id).await?;

    Ok(Json(ReservationOut::from(reservation)))
}

pub async fn update_reservation_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(reservation_id): Path<Uuid>,
    Json(update_in): Json<ReservationUpdateIn>,
) -> Result<impl IntoResponse, AppError> {
    let reservation =
        update_reservation(&database.pool, &claims.sub, &reservation_id, update_in).await?;

    Ok(Json(ReservationOut::from(reservation)))
}

pub async fn remove_reservation_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    remove_reservation(&database.pool, &claims.sub, &reservation_id).await?;

    Ok(Json(json!({"message": "Successfully cancelled reservation."})))
}
