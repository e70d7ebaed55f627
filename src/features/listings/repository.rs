use std::str::FromStr;

use sqlx::{PgPool, QueryBuilder};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::features::cities::repository::resolve_city;
use crate::features::listings::models::{Amenity, Listing};
use crate::features::listings::schemas::{ListingIn, ListingQuery, ListingUpdateIn};
use crate::services::{geocoding::Geocoder, photos::PhotoSearch};
use crate::utilities::errors::AppError;
use crate::utilities::validation::{validate_description, validate_name, validate_photos};

// Columns the catalogue may sort on.
const ORDERABLE_COLUMNS: &[&str] = &["name", "price", "rating", "created_at"];

pub async fn create_listing(
    pool: &PgPool,
    geocoder: &Geocoder,
    photos: &PhotoSearch,
    owner_id: &Uuid,
    listing_in: ListingIn,
) -> Result<Listing, AppError> {
    listing_in.validate()?;

    let name = validate_name(&listing_in.name)?;
    let description = validate_description(&listing_in.description)?;
    validate_photos(&listing_in.photos)?;

    let owner_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
    if owner_exists == 0 {
        return Err(AppError::UnauthorizedError(
            "User account does not exist.".to_string(),
        ));
    }

    // The city link is derived from the geocoder's structured response,
    // never from client input.
    let geocoded = geocoder.geocode_address(&listing_in.address).await?;

    let city_id = resolve_city(
        pool,
        geocoder,
        photos,
        &geocoded.city,
        &geocoded.state,
        &geocoded.region,
        &geocoded.country,
    )
    .await?;

    let amenities = amenity_strings(&listing_in.amenities);

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings (
            id, owner_id, city_id, name, description, address,
            latitude, longitude, beds, baths, max_guests, price,
            amenities, photos
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(city_id)
    .bind(&name)
    .bind(&description)
    .bind(&geocoded.street)
    .bind(geocoded.latitude)
    .bind(geocoded.longitude)
    .bind(listing_in.beds)
    .bind(listing_in.baths)
    .bind(listing_in.max_guests)
    .bind(listing_in.price)
    .bind(&amenities)
    .bind(&listing_in.photos)
    .fetch_one(pool)
    .await?;

    info!("created listing {} for owner {owner_id}", listing.id);

    Ok(listing)
}

pub async fn get_one_listing(pool: &PgPool, listing_id: &Uuid) -> Result<Listing, AppError> {
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
        .bind(listing_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Place not found.".to_string()))
}

pub async fn get_listings_by_owner(
    pool: &PgPool,
    owner_id: &Uuid,
) -> Result<Vec<Listing>, AppError> {
    let listings = sqlx::query_as::<_, Listing>(
        "SELECT * FROM listings WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(listings)
}

pub async fn get_listings_in_city(
    pool: &PgPool,
    city_id: &Uuid,
) -> Result<Vec<Listing>, AppError> {
    let listings = sqlx::query_as::<_, Listing>(
        "SELECT * FROM listings WHERE city_id = $1 ORDER BY rating DESC",
    )
    .bind(city_id)
    .fetch_all(pool)
    .await?;

    Ok(listings)
}

pub async fn get_many_listings(
    pool: &PgPool,
    query: &ListingQuery,
) -> Result<Vec<Listing>, AppError> {
    query.validate()?;

    let mut select_qb = QueryBuilder::new("SELECT * FROM listings WHERE TRUE");

    if let Some(owner) = query.owner {
        select_qb.push(" AND owner_id = ").push_bind(owner);
    }
    if let Some(city) = query.city {
        select_qb.push(" AND city_id = ").push_bind(city);
    }
    if let Some(amenities) = &query.amenities {
        let amenities = parse_amenity_filter(amenities)?;
        select_qb.push(" AND amenities @> ").push_bind(amenities);
    }
    if let Some(min_beds) = query.min_beds {
        select_qb.push(" AND beds >= ").push_bind(min_beds);
    }
    if let Some(min_baths) = query.min_baths {
        select_qb.push(" AND baths >= ").push_bind(min_baths);
    }
    if let Some(min_guests) = query.min_guests {
        select_qb.push(" AND max_guests >= ").push_bind(min_guests);
    }
    if let Some(max_price) = query.max_price {
        select_qb.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(min_rating) = query.min_rating {
        select_qb.push(" AND rating >= ").push_bind(min_rating);
    }

    // The sort column is interpolated, never bound, so it must come off
    // the whitelist.
    let order_by = order_column(query.order_by.as_deref())?;
    select_qb.push(format!(" ORDER BY {order_by}"));
    if order_by == "rating" || order_by == "created_at" {
        select_qb.push(" DESC");
    }

    select_qb.push(" LIMIT ").push_bind(query.limit);
    select_qb.push(" OFFSET ").push_bind(query.offset);

    let listings = select_qb
        .build_query_as::<Listing>()
        .fetch_all(pool)
        .await?;

    Ok(listings)
}

pub async fn update_listing(
    pool: &PgPool,
    requester_id: &Uuid,
    listing_id: &Uuid,
    update_in: ListingUpdateIn,
) -> Result<Listing, AppError> {
    update_in.validate()?;

    let listing = get_one_listing(pool, listing_id).await?;
    if listing.owner_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    let name = match &update_in.name {
        Some(name) => Some(validate_name(name)?),
        None => None,
    };
    let description = match &update_in.description {
        Some(description) => Some(validate_description(description)?),
        None => None,
    };
    if let Some(photos) = &update_in.photos {
        validate_photos(photos)?;
    }

    let mut update_qb = QueryBuilder::new("UPDATE listings SET updated_at = now()");

    if let Some(name) = name {
        update_qb.push(", name = ").push_bind(name);
    }
    if let Some(description) = description {
        update_qb.push(", description = ").push_bind(description);
    }
    if let Some(beds) = update_in.beds {
        update_qb.push(", beds = ").push_bind(beds);
    }
    if let Some(baths) = update_in.baths {
        update_qb.push(", baths = ").push_bind(baths);
    }
    if let Some(max_guests) = update_in.max_guests {
        update_qb.push(", max_guests = ").push_bind(max_guests);
    }
    if let Some(price) = update_in.price {
        update_qb.push(", price = ").push_bind(price);
    }
    if let Some(amenities) = &update_in.amenities {
        update_qb
            .push(", amenities = ")
            .push_bind(amenity_strings(amenities));
    }
    if let Some(photos) = &update_in.photos {
        update_qb.push(", photos = ").push_bind(photos.clone());
    }

    update_qb.push(" WHERE id = ").push_bind(listing_id);
    update_qb.push(" RETURNING *");

    let listing = update_qb
        .build_query_as::<Listing>()
        .fetch_one(pool)
        .await?;

    Ok(listing)
}

pub async fn remove_listing(
    pool: &PgPool,
    requester_id: &Uuid,
    listing_id: &Uuid,
) -> Result<(), AppError> {
    let listing = get_one_listing(pool, listing_id).await?;
    if listing.owner_id != *requester_id {
        return Err(AppError::ForbiddenError("Invalid credentials.".to_string()));
    }

    // Reservations and reviews go with it via the FK cascades.
    sqlx::query("DELETE FROM listings WHERE id = $1")
        .bind(listing_id)
        .execute(pool)
        .await?;

    info!("removed listing {listing_id}");

    Ok(())
}

fn amenity_strings(amenities: &[Amenity]) -> Vec<String> {
    amenities
        .iter()
        .map(|amenity| amenity.as_str().to_string())
        .collect()
}

/// Comma-separated amenity filter, e.g. `WIFI,POOL`. Unknown names are a
/// validation error rather than a silent empty match.
fn parse_amenity_filter(raw: &str) -> Result<Vec<String>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Amenity::from_str(token).map(|amenity| amenity.as_str().to_string()))
        .collect()
}

fn order_column(requested: Option<&str>) -> Result<&'static str, AppError> {
    match requested {
        None => Ok("created_at"),
        Some(requested) => ORDERABLE_COLUMNS
            .iter()
            .find(|column| **column == requested)
            .copied()
            .ok_or_else(|| {
                AppError::ValidationError(format!("Cannot order results by '{requested}'."))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenity_filter_parses_comma_separated_names() {
        let parsed = parse_amenity_filter("WIFI, POOL").unwrap();
        assert_eq!(parsed, vec!["WIFI".to_string(), "POOL".to_string()]);
    }

    #[test]
    fn amenity_filter_rejects_unknown_names() {
        assert!(parse_amenity_filter("WIFI,SAUNA").is_err());
    }

    #[test]
    fn order_column_defaults_and_whitelists() {
        assert_eq!(order_column(None).unwrap(), "created_at");
        assert_eq!(order_column(Some("price")).unwrap(), "price");
        assert!(order_column(Some("password")).is_err());
    }
}
