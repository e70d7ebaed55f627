pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/places",
            get(handlers::get_many_listings_handler).post(handlers::create_listing_handler),
        )
        .route(
            "/api/places/{id}",
            get(handlers::get_one_listing_handler)
                .put(handlers::update_listing_handler)
                .delete(handlers::remove_listing_handler),
        )
        .route(
            "/api/places/in/{city_id}",
            get(handlers::get_listings_in_city_handler),
        )
}
