pub mod accommodations;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod destinations;
pub mod engagement;
pub mod home;
pub mod middleware;
pub mod preferences;
pub mod profile;
pub mod reviews;
