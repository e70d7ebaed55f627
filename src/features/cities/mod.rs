pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cities", get(handlers::get_many_cities_handler))
        .route("/api/cities/{id}", get(handlers::get_one_city_handler))
}
