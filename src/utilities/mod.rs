pub mod app_state;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod validation;
pub mod visibility;
