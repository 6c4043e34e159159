pub mod accommodation;
pub mod activity;
pub mod booking;
pub mod city;
pub mod destination;
pub mod favorite;
pub mod preference;
pub mod ranking;
pub mod rating;
pub mod review;
pub mod stats;
pub mod user;
pub mod visit;
