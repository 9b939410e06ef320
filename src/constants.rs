//! Business constants shared by the validator, the query layer, and the
//! catalog endpoint. Keeping them in one place means the frontend and the
//! validation rules can never drift apart.

use chrono::{Datelike, Utc};

pub const CUSTOMER_NAME_MIN_LEN: usize = 2;
pub const CUSTOMER_NAME_MAX_LEN: usize = 100;

pub const MIN_CAR_YEAR: i64 = 1900;

pub const MIN_DURATION_MINUTES: i64 = 15;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Flat price added per selected addon, in dollars.
pub const ADDON_PRICE: f64 = 15.0;
/// Extra minutes each addon adds to the appointment.
pub const ADDON_DURATION_MINUTES: i64 = 15;

/// The eight fixed daily appointment start times.
pub const TIME_SLOTS: &[&str] = &[
    "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM",
    "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
];

/// Upper bound for `carDetails.year`: next year's models are accepted.
/// Computed per call rather than at startup so a long-lived process rolls
/// over correctly on January 1st.
pub fn max_car_year() -> i64 {
    i64::from(Utc::now().year()) + 1
}
