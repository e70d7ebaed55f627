use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::utilities::errors::AppError;

const LOCATION_IQ_URL: &str = "https://us1.locationiq.com/v1/search.php";

// Placemark types LocationIQ reports for street addresses of dwellings.
const RESIDENTIAL_TYPES: &[&str] = &["house", "residential", "building", "apartments", "yes"];

#[derive(Deserialize, Debug)]
pub struct PlacemarkAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Placemark {
    pub lat: String,
    pub lon: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub address: Option<PlacemarkAddress>,
}

/// A street address resolved to coordinates and structured components.
#[derive(Debug)]
pub struct GeocodedAddress {
    pub latitude: f64,
    pub longitude: f64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub country: String,
}

#[derive(Clone)]
pub struct Geocoder {
    client: Client,
    api_key: String,
}

/// The leading token of a street address must be an integer house number.
/// Checked before any provider call.
pub fn parse_house_number(address: &str) -> Result<i64, AppError> {
    address
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or_else(|| AppError::InvalidAddressError("Invalid street address.".to_string()))
}

impl Geocoder {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    pub async fn geocode_address(&self, address: &str) -> Result<GeocodedAddress, AppError> {
        let house_number = parse_house_number(address)?;

        let placemarks: Vec<Placemark> = self
            .client
            .get(LOCATION_IQ_URL)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let placemark = placemarks.into_iter().next().ok_or_else(|| {
            AppError::InvalidAddressError(
                "Could not validate address. Please check to make sure address is correct."
                    .to_string(),
            )
        })?;

        debug!("geocoded '{}' to {:?}", address, placemark);

        if let Some(kind) = &placemark.kind
            && !RESIDENTIAL_TYPES.contains(&kind.as_str())
        {
            return Err(AppError::InvalidAddressError(
                "Please make sure your address contains a street address.".to_string(),
            ));
        }

        let components = placemark.address.ok_or_else(|| {
            AppError::InvalidAddressError(
                "Could not validate address. Please check to make sure address is correct."
                    .to_string(),
            )
        })?;

        let road = components.road.unwrap_or_default();
        // The provider intermittently drops the house number from its
        // structured response; fall back to the parsed leading token.
        let house_number = components
            .house_number
            .unwrap_or_else(|| house_number.to_string());

        Ok(GeocodedAddress {
            latitude: parse_coordinate(&placemark.lat)?,
            longitude: parse_coordinate(&placemark.lon)?,
            street: format!("{house_number} {road}"),
            city: components.city.unwrap_or_default(),
            state: components.state.unwrap_or_default(),
            region: components.region.unwrap_or_default(),
            country: components.country.unwrap_or_default(),
        })
    }

    pub async fn geocode_city(
        &self,
        name: &str,
        state: &str,
        region: &str,
        country: &str,
    ) -> Result<(f64, f64), AppError> {
        let placemarks: Vec<Placemark> = self
            .client
            .get(LOCATION_IQ_URL)
            .query(&[
                ("city", name),
                ("state", state),
                ("region", region),
                ("country", country),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let placemark = placemarks.into_iter().next().ok_or_else(|| {
            AppError::EnrichmentError(format!("Could not resolve coordinates for city {name}"))
        })?;

        Ok((
            parse_coordinate(&placemark.lat)?,
            parse_coordinate(&placemark.lon)?,
        ))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, AppError> {
    raw.parse::<f64>().map_err(|_| {
        AppError::EnrichmentError(format!("Provider returned malformed coordinate '{raw}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_house_number_is_parsed() {
        assert_eq!(parse_house_number("123 Main Street, Springfield").unwrap(), 123);
    }

    #[test]
    fn address_without_house_number_is_rejected() {
        assert!(parse_house_number("Main Street, Springfield").is_err());
    }

    #[test]
    fn rejection_names_the_street_address() {
        let err = parse_house_number("Main Street").unwrap_err();
        assert_eq!(err.to_string(), "Invalid street address.");
    }

    #[test]
    fn coordinate_parsing() {
        assert_eq!(parse_coordinate("41.31").unwrap(), 41.31);
        assert!(parse_coordinate("not-a-number").is_err());
    }
}
