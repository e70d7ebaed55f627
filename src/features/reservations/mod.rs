pub mod handlers;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    routing::{get, put},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reservations/for/{place_id}",
            get(handlers::get_reservations_for_listing_handler)
                .post(handlers::create_reservation_handler),
        )
        .route(
            "/api/reservations/confirm/{id}",
            put(handlers::confirm_reservation_handler),
        )
        .route(
            "/api/reservations/{id}",
            get(handlers::get_one_reservation_handler)
                .put(handlers::update_reservation_handler)
                .delete(handlers::remove_reservation_handler),
        )
}
