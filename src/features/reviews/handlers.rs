use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    features::reviews::{
        repository::{
            create_review, get_one_review, get_reviews_for_listing, remove_review, update_review,
        },
        schemas::{ReviewIn, ReviewOut, ReviewUpdateIn, ReviewsResponse},
    },
    services::database::Database,
    utilities::{errors::AppError, jwt::Claims},
};

pub async fn create_review_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
    Json(review_in): Json<ReviewIn>,
) -> Result<impl IntoResponse, AppError> {
    let review = create_review(&database.pool, &claims.sub, &listing_id, review_in).await?;

    Ok((StatusCode::CREATED, Json(ReviewOut::from(review))))
}

pub async fn get_reviews_for_listing_handler(
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reviews = get_reviews_for_listing(&database.pool, &listing_id).await?;

    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(ReviewOut::from).collect(),
    }))
}

pub async fn get_one_review_handler(
    State(database): State<Database>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let review = get_one_review(&database.pool, &review_id).await?;

    Ok(Json(ReviewOut::from(review)))
}

pub async fn update_review_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(review_id): Path<Uuid>,
    Json(update_in): Json<ReviewUpdateIn>,
) -> Result<impl IntoResponse, AppError> {
    let review = update_review(&database.pool, &claims.sub, &review_id, update_in).await?;

    Ok(Json(ReviewOut::from(review)))
}

pub async fn remove_review_handler(
    claims: Claims,
    State(database): State<Database>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    remove_review(&database.pool, &claims.sub, &review_id).await?;

    Ok(Json(json!({"message": "Successfully removed review."})))
}
