use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::features::cities::models::City;
use crate::services::{geocoding::Geocoder, photos::PhotoSearch};
use crate::utilities::errors::AppError;

/// Look up a city by its composite key, creating it with enrichment on a
/// miss. The unique constraint plus upsert keeps concurrent first-time
/// bookings for the same place from leaving duplicate rows.
pub async fn resolve_city(
    pool: &PgPool,
    geocoder: &Geocoder,
    photos: &PhotoSearch,
    name: &str,
    state: &str,
    region: &str,
    country: &str,
) -> Result<Uuid, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM cities WHERE name = $1 AND state = $2 AND region = $3 AND country = $4",
    )
    .bind(name)
    .bind(state)
    .bind(region)
    .bind(country)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let (latitude, longitude) = geocoder.geocode_city(name, state, region, country).await?;
    let photo = photos.fetch_city_photo(name).await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO cities (id, name, state, region, country, latitude, longitude, photo)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (name, state, region, country) DO UPDATE SET photo = EXCLUDED.photo
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(state)
    .bind(region)
    .bind(country)
    .bind(latitude)
    .bind(longitude)
    .bind(photo)
    .fetch_one(pool)
    .await?;

    info!("created city {name}, {country} ({id})");

    Ok(id)
}

pub async fn get_many_cities(pool: &PgPool) -> Result<Vec<City>, AppError> {
    let cities = sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(cities)
}

pub async fn get_one_city(pool: &PgPool, city_id: &Uuid) -> Result<City, AppError> {
    sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = $1")
        .bind(city_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("City not found.".to_string()))
}
