use reqwest::Client;
use serde::Deserialize;

use crate::utilities::errors::AppError;

const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

#[derive(Deserialize, Debug)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize, Debug)]
struct PhotoResult {
    urls: PhotoUrls,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    results: Vec<PhotoResult>,
}

#[derive(Clone)]
pub struct PhotoSearch {
    client: Client,
    access_key: String,
}

impl PhotoSearch {
    pub fn new(client: Client, access_key: String) -> Self {
        Self { client, access_key }
    }

    /// One landscape photo representing the city, for its card in the UI.
    pub async fn fetch_city_photo(&self, city: &str) -> Result<String, AppError> {
        let response: SearchResponse = self
            .client
            .get(UNSPLASH_SEARCH_URL)
            .query(&[
                ("query", format!("{city} city").as_str()),
                ("orientation", "landscape"),
                ("page", "1"),
                ("per_page", "1"),
            ])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .results
            .into_iter()
            .next()
            .map(|result| result.urls.regular)
            .ok_or_else(|| AppError::EnrichmentError(format!("No photo found for city {city}")))
    }
}
