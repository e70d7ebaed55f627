use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utilities::errors::AppError;

/// A rentable place. Coordinates and the city link come from geocoding at
/// creation time, never from the client. The rating columns are a running
/// aggregate maintained by the reviews repository.
#[derive(FromRow, Debug)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub beds: i32,
    pub baths: i32,
    pub max_guests: i32,
    pub price: i32,
    pub amenities: Vec<String>,
    pub photos: Vec<String>,
    pub rating_sum: i32,
    pub review_count: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Amenity {
    Kitchen,
    Wifi,
    AirConditioning,
    Heating,
    Tv,
    Washer,
    Dryer,
    FreeParking,
    Pool,
    HotTub,
}

impl Amenity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Kitchen => "KITCHEN",
            Amenity::Wifi => "WIFI",
            Amenity::AirConditioning => "AIR_CONDITIONING",
            Amenity::Heating => "HEATING",
            Amenity::Tv => "TV",
            Amenity::Washer => "WASHER",
            Amenity::Dryer => "DRYER",
            Amenity::FreeParking => "FREE_PARKING",
            Amenity::Pool => "POOL",
            Amenity::HotTub => "HOT_TUB",
        }
    }
}

impl FromStr for Amenity {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "KITCHEN" => Ok(Amenity::Kitchen),
            "WIFI" => Ok(Amenity::Wifi),
            "AIR_CONDITIONING" => Ok(Amenity::AirConditioning),
            "HEATING" => Ok(Amenity::Heating),
            "TV" => Ok(Amenity::Tv),
            "WASHER" => Ok(Amenity::Washer),
            "DRYER" => Ok(Amenity::Dryer),
            "FREE_PARKING" => Ok(Amenity::FreeParking),
            "POOL" => Ok(Amenity::Pool),
            "HOT_TUB" => Ok(Amenity::HotTub),
            other => Err(AppError::ValidationError(format!(
                "Unknown amenity: {other}."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenity_round_trips_through_str() {
        for amenity in [
            Amenity::Kitchen,
            Amenity::Wifi,
            Amenity::AirConditioning,
            Amenity::Heating,
            Amenity::Tv,
            Amenity::Washer,
            Amenity::Dryer,
            Amenity::FreeParking,
            Amenity::Pool,
            Amenity::HotTub,
        ] {
            assert_eq!(Amenity::from_str(amenity.as_str()).unwrap(), amenity);
        }
    }

    #[test]
    fn unknown_amenity_is_rejected() {
        assert!(Amenity::from_str("SAUNA").is_err());
    }
}
