pub mod handlers;
pub mod models;
pub mod rating;
pub mod repository;
pub mod schemas;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reviews/for/{place_id}",
            get(handlers::get_reviews_for_listing_handler).post(handlers::create_review_handler),
        )
        .route(
            "/api/reviews/{id}",
            get(handlers::get_one_review_handler)
                .put(handlers::update_review_handler)
                .delete(handlers::remove_review_handler),
        )
}
