use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    features::{
        listings::{
            repository::{
                create_listing, get_listings_in_city, get_many_listings, get_one_listing,
                remove_listing, update_listing,
            },
            schemas::{ListingIn, ListingOut, ListingQuery, ListingUpdateIn, ListingsResponse},
        },
        reservations::{repository::get_reservations_by_listing, schemas::ReservationOut},
    },
    services::{database::Database, geocoding::Geocoder, photos::PhotoSearch},
    utilities::{
        errors::AppError,
        jwt::{Claims, OptionalClaims},
    },
};

// -- =====================
// -- CREATE
// -- =====================
pub async fn create_listing_handler(
    claims: Claims,
    State(database): State<Database>,
    State(geocoder): State<Geocoder>,
    State(photos): State<PhotoSearch>,
    Json(listing_in): Json<ListingIn>,
) -> Result<impl IntoResponse, AppError> {
    let listing = create_listing(&database.pool, &geocoder, &photos, &claims.sub, listing_in).await?;

    Ok((
        StatusCode::CREATED,
        Json(ListingOut::redacted(listing, Some(claims.sub), None)),
    ))
}

// -- =====================
// -- READ
// -- =====================
pub async fn get_many_listings_handler(
    optional_claims: OptionalClaims,
    State(database): State<Database>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let requester = optional_claims.user_id();
    let listings = get_many_listings(&database.pool, &query).await?;

    Ok(Json(ListingsResponse {
        places: listings
            .into_iter()
            .map(|listing| ListingOut::redacted(listing, requester, None))
            .collect(),
    }))
}

pub async fn get_one_listing_handler(
    optional_claims: OptionalClaims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let requester = optional_claims.user_id();
    let listing = get_one_listing(&database.pool, &listing_id).await?;

    // The calendar is only fetched when the owner is asking.
    let reservations = if requester == Some(listing.owner_id) {
        let reservations = get_reservations_by_listing(&database.pool, &listing_id).await?;
        Some(reservations.into_iter().map(ReservationOut::from).collect())
    } else {
        None
    };

    Ok(Json(ListingOut::redacted(listing, requester, reservations)))
}

pub async fn get_listings_in_city_handler(
    optional_claims: OptionalClaims,
    State(database): State<Database>,
    Path(city_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let requester = optional_claims.user_id();
    let listings = get_listings_in_city(&database.pool, &city_id).await?;

    Ok(Json(ListingsResponse {
        places: listings
            .into_iter()
            .map(|listing| ListingOut::redacted(listing, requester, None))
            .collect(),
    }))
}

// -- =====================
// -- UPDATE / DELETE
// -- =====================
pub async fn update_listing_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
    Json(update_in): Json<ListingUpdateIn>,
) -> Result<impl IntoResponse, AppError> {
    let listing = update_listing(&database.pool, &claims.sub, &listing_id, update_in).await?;

    Ok(Json(ListingOut::redacted(listing, Some(claims.sub), None)))
}

pub async fn remove_listing_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    remove_listing(&database.pool, &claims.sub, &listing_id).await?;

    Ok(Json(json!({"message": "Successfully removed place."})))
}
