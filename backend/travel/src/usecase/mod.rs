pub mod accommodations;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod contracts;
pub mod destinations;
pub mod engagement;
pub mod error;
pub mod home;
pub mod jwt;
pub mod password;
pub mod preferences;
pub mod reviews;
