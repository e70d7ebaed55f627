use crate::{
    services::{database::Database, geocoding::Geocoder, photos::PhotoSearch},
    utilities::config::Config,
};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub geocoder: Geocoder,
    pub photos: PhotoSearch,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Geocoder {
    fn from_ref(state: &AppState) -> Self {
        state.geocoder.clone()
    }
}

impl FromRef<AppState> for PhotoSearch {
    fn from_ref(state: &AppState) -> Self {
        state.photos.clone()
    }
}
