pub mod app;
pub mod bookings;
pub mod catalog;
pub mod health;
