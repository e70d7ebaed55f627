use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::features::{cities, listings, reservations, reviews, users};
use crate::utilities::app_state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(users::routes())
        .merge(cities::routes())
        .merge(listings::routes())
        .merge(reservations::routes())
        .merge(reviews::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
