pub mod booking;

pub use booking::{Addon, Booking, BookingPayload, BookingStatus, CarDetails, CarType, ServiceType};
