pub mod handlers;
pub mod models;
pub mod schemas;

use axum::{
    Router,
    routing::{get, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(handlers::register_user_handler))
        .route("/api/auth", post(handlers::login_user_handler))
        .route(
            "/api/users/{id}",
            get(handlers::get_user_handler).put(handlers::update_user_handler),
        )
        .route(
            "/api/users/deactivate",
            post(handlers::deactivate_user_handler),
        )
}
