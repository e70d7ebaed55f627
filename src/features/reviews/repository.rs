use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::features::listings::repository::get_one_listing;
use crate::features::reviews::models::Review;
use crate::features::reviews::rating::RatingAggregate;
use crate::features::reviews::schemas::{ReviewIn, ReviewUpdateIn};
use crate::utilities::errors::{AppError, is_unique_violation};
use crate::utilities::validation::{validate_rating, validate_review_body, validate_review_title};

/// The review write and the aggregate update commit together; a crash
/// between the two can never leave the listing's rating out of step with
/// its reviews.
pub async fn create_review(
    pool: &PgPool,
    author_id: &Uuid,
    listing_id: &Uuid,
    review_in: ReviewIn,
) -> Result<Review, AppError> {
    validate_rating(review_in.rating)?;
    let title = validate_review_title(&review_in.title)?;
    let body = validate_review_body(&review_in.body)?;

    let listing = get_one_listing(pool, listing_id).await?;
    if listing.owner_id == *author_id {
        return Err(AppError::BusinessRuleError(
            "Cannot write a review for your own place.".to_string(),
        ));
    }

    let user_name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
        .bind(author_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::UnauthorizedError("User account does not exist.".to_string())
        })?;

    let mut tx = pool.begin().await?;

    let mut aggregate = lock_aggregate(&mut tx, listing_id).await?;

    let insert_result = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, author_id, listing_id, rating, title, body, user_name, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(listing_id)
    .bind(review_in.rating)
    .bind(&title)
    .bind(&body)
    .bind(&user_name)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await;

    let review = insert_result.map_err(|err| {
        if is_unique_violation(&err) {
            AppError::BusinessRuleError(
                "Cannot write multiple reviews for one place.".to_string(),
            )
        } else {
            AppError::SqlxError(err)
        }
    })?;

    aggregate.apply_create(review_in.rating);
    store_aggregate(&mut tx, listing_id, aggregate).await?;

    tx.commit().await?;

    info!("created review {} on listing {listing_id}", review.id);

    Ok(review)
}

pub async fn get_reviews_for_listing(
    pool: &PgPool,
    listing_id: &Uuid,
) -> Result<Vec<Review>, AppError> {
    get_one_listing(pool, listing_id).await?;

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE listing_id = $1 ORDER BY date DESC",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

pub async fn get_one_review(pool: &PgPool, review_id: &Uuid) -> Result<Review, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
        .bind(review_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Review not found.".to_string()))
}

pub async fn update_review(
    pool: &PgPool,
    requester_id: &Uuid,
    review_id: &Uuid,
    update_in: ReviewUpdateIn,
) -> Result<Review, AppError> {
    let review = get_one_review(pool, review_id).await?;
    if review.author_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    if let Some(rating) = update_in.rating {
        validate_rating(rating)?;
    }
    let title = match &update_in.title {
        Some(title) => validate_review_title(title)?,
        None => review.title.clone(),
    };
    let body = match &update_in.body {
        Some(body) => validate_review_body(body)?,
        None => review.body.clone(),
    };
    let rating = update_in.rating.unwrap_or(review.rating);

    let mut tx = pool.begin().await?;

    if rating != review.rating {
        let mut aggregate = lock_aggregate(&mut tx, &review.listing_id).await?;
        aggregate.apply_rating_change(review.rating, rating);
        store_aggregate(&mut tx, &review.listing_id, aggregate).await?;
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews SET rating = $1, title = $2, body = $3, updated_at = now()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(rating)
    .bind(&title)
    .bind(&body)
    .bind(review_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(review)
}

pub async fn remove_review(
    pool: &PgPool,
    requester_id: &Uuid,
    review_id: &Uuid,
) -> Result<(), AppError> {
    let review = get_one_review(pool, review_id).await?;
    if review.author_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    let mut tx = pool.begin().await?;

    let mut aggregate = lock_aggregate(&mut tx, &review.listing_id).await?;
    aggregate.apply_delete(review.rating);
    store_aggregate(&mut tx, &review.listing_id, aggregate).await?;

    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("removed review {review_id}");

    Ok(())
}

/// Fold every review by this author out of the affected listings'
/// aggregates. Runs inside the caller's transaction, before the rows
/// themselves go away, so an FK cascade cannot strand a stale rating.
pub async fn retract_author_ratings(
    tx: &mut Transaction<'_, Postgres>,
    author_id: &Uuid,
) -> Result<(), AppError> {
    let rows: Vec<(Uuid, i32)> = sqlx::query_as(
        "SELECT listing_id, rating FROM reviews WHERE author_id = $1 ORDER BY listing_id",
    )
    .bind(author_id)
    .fetch_all(&mut **tx)
    .await?;

    // BTreeMap keeps the listing lock order deterministic.
    let mut by_listing: BTreeMap<Uuid, Vec<i32>> = BTreeMap::new();
    for (listing_id, rating) in rows {
        by_listing.entry(listing_id).or_default().push(rating);
    }

    for (listing_id, ratings) in by_listing {
        let mut aggregate = lock_aggregate(tx, &listing_id).await?;
        for rating in ratings {
            aggregate.apply_delete(rating);
        }
        store_aggregate(tx, &listing_id, aggregate).await?;
    }

    Ok(())
}

async fn lock_aggregate(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &Uuid,
) -> Result<RatingAggregate, AppError> {
    let (rating_sum, review_count) = sqlx::query_as::<_, (i32, i32)>(
        "SELECT rating_sum, review_count FROM listings WHERE id = $1 FOR UPDATE",
    )
    .bind(listing_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFoundError("Place not found.".to_string()))?;

    Ok(RatingAggregate::new(rating_sum, review_count))
}

async fn store_aggregate(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &Uuid,
    aggregate: RatingAggregate,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE listings SET rating_sum = $1, review_count = $2, rating = $3, updated_at = now()
        WHERE id = $4
        "#,
    )
    .bind(aggregate.rating_sum)
    .bind(aggregate.review_count)
    .bind(aggregate.rating)
    .bind(listing_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
