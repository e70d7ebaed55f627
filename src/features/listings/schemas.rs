use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::features::listings::models::{Amenity, Listing};
use crate::features::reservations::schemas::ReservationOut;
use crate::utilities::visibility::owner_gated;

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Validate, Debug)]
#[serde(deny_unknown_fields)]
pub struct ListingIn {
    pub name: String,
    pub description: String,
    pub address: String,
    #[validate(range(min = 1, message = "Beds must be at least 1."))]
    pub beds: i32,
    #[validate(range(min = 1, message = "Baths must be at least 1."))]
    pub baths: i32,
    #[validate(range(min = 1, message = "Max guests must be at least 1."))]
    pub max_guests: i32,
    #[validate(range(min = 1, message = "Price must be at least 1."))]
    pub price: i32,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Partial update. The address, coordinates, city link, owner and rating
/// aggregate are not client-writable after creation.
#[derive(Deserialize, Validate, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ListingUpdateIn {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Beds must be at least 1."))]
    pub beds: Option<i32>,
    #[validate(range(min = 1, message = "Baths must be at least 1."))]
    pub baths: Option<i32>,
    #[validate(range(min = 1, message = "Max guests must be at least 1."))]
    pub max_guests: Option<i32>,
    #[validate(range(min = 1, message = "Price must be at least 1."))]
    pub price: Option<i32>,
    pub amenities: Option<Vec<Amenity>>,
    pub photos: Option<Vec<String>>,
}

/// Catalogue filters. Every field is optional and the filters AND together.
#[derive(Deserialize, Validate, Debug, Default)]
pub struct ListingQuery {
    pub owner: Option<Uuid>,
    pub city: Option<Uuid>,
    pub amenities: Option<String>,
    pub min_beds: Option<i32>,
    pub min_baths: Option<i32>,
    pub min_guests: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rating: Option<f64>,
    pub order_by: Option<String>,
    #[validate(range(min = 0, message = "Offset must not be negative."))]
    #[serde(default)]
    pub offset: i64,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100."))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
pub struct ListingOut {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub beds: i32,
    pub baths: i32,
    pub max_guests: i32,
    pub price: i32,
    pub amenities: Vec<String>,
    pub photos: Vec<String>,
    pub rating: f64,
    pub review_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations: Option<Vec<ReservationOut>>,
}

impl ListingOut {
    /// The exact street address and the reservation calendar stay private
    /// to the owner; everyone else sees the listing down to coordinates.
    pub fn redacted(
        listing: Listing,
        requester: Option<Uuid>,
        reservations: Option<Vec<ReservationOut>>,
    ) -> Self {
        let owner_id = listing.owner_id;
        Self {
            id: listing.id,
            owner_id,
            city_id: listing.city_id,
            name: listing.name,
            description: listing.description,
            address: owner_gated(owner_id, requester, listing.address),
            latitude: listing.latitude,
            longitude: listing.longitude,
            beds: listing.beds,
            baths: listing.baths,
            max_guests: listing.max_guests,
            price: listing.price,
            amenities: listing.amenities,
            photos: listing.photos,
            rating: listing.rating,
            review_count: listing.review_count,
            reservations: if requester == Some(owner_id) {
                reservations
            } else {
                None
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ListingsResponse {
    pub places: Vec<ListingOut>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_listing(owner_id: Uuid) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id,
            city_id: Uuid::new_v4(),
            name: "Seaside Cottage".to_string(),
            description: "A cottage by the sea.".to_string(),
            address: "12 Harbour Lane".to_string(),
            latitude: 41.38,
            longitude: 2.17,
            beds: 2,
            baths: 1,
            max_guests: 4,
            price: 120,
            amenities: vec!["WIFI".to_string()],
            photos: vec![],
            rating_sum: 9,
            review_count: 2,
            rating: 4.5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn listing_input_has_no_city_fields() {
        // The city link comes out of the geocoder's structured response;
        // a payload naming one is rejected outright.
        let payload = serde_json::json!({
            "name": "Seaside Cottage",
            "description": "A cottage by the sea.",
            "address": "12 Harbour Lane",
            "city": "Springfield",
            "beds": 2,
            "baths": 1,
            "max_guests": 4,
            "price": 120
        });
        assert!(serde_json::from_value::<ListingIn>(payload).is_err());

        let payload = serde_json::json!({
            "name": "Seaside Cottage",
            "description": "A cottage by the sea.",
            "address": "12 Harbour Lane",
            "beds": 2,
            "baths": 1,
            "max_guests": 4,
            "price": 120
        });
        assert!(serde_json::from_value::<ListingIn>(payload).is_ok());
    }

    #[test]
    fn negative_offset_is_rejected() {
        use validator::Validate;

        let query = ListingQuery {
            offset: -1,
            limit: 20,
            ..ListingQuery::default()
        };
        assert!(query.validate().is_err());

        let query = ListingQuery {
            offset: 0,
            limit: 20,
            ..ListingQuery::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn owner_sees_address() {
        let owner_id = Uuid::new_v4();
        let out = ListingOut::redacted(sample_listing(owner_id), Some(owner_id), None);
        assert_eq!(out.address.as_deref(), Some("12 Harbour Lane"));
    }

    #[test]
    fn other_requester_sees_no_address() {
        let out = ListingOut::redacted(sample_listing(Uuid::new_v4()), Some(Uuid::new_v4()), None);
        assert_eq!(out.address, None);
    }

    #[test]
    fn reservations_only_reach_the_owner() {
        let owner_id = Uuid::new_v4();
        let out = ListingOut::redacted(sample_listing(owner_id), Some(owner_id), Some(vec![]));
        assert!(out.reservations.is_some());

        let out = ListingOut::redacted(sample_listing(owner_id), None, Some(vec![]));
        assert!(out.reservations.is_none());
    }
}
