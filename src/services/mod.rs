pub mod database;
pub mod geocoding;
pub mod photos;
