pub mod cities;
pub mod listings;
pub mod reservations;
pub mod reviews;
pub mod users;
