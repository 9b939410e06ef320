use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Current UTC time truncated to whole seconds, the precision the storage
/// layer keeps. Using anything finer here would make a freshly created
/// record differ from its stored form.
pub fn timestamp_now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// One car-wash appointment record, the only entity in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub car_details: CarDetails,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub timeslot: String,
    pub duration: i64,
    pub price: f64,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The client-supplied part of a booking: everything except the identifier
/// and the storage-maintained timestamps. Used for both create and full
/// replacement on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub customer_name: String,
    pub car_details: CarDetails,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub timeslot: String,
    pub duration: i64,
    pub price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub addons: Vec<Addon>,
}

impl Booking {
    /// Assemble a full record from a validated payload. Timestamps are the
    /// caller's clock reading; identifiers are caller-assigned.
    pub fn from_payload(id: String, payload: BookingPayload, now: NaiveDateTime) -> Self {
        Self {
            id,
            customer_name: payload.customer_name,
            car_details: payload.car_details,
            service_type: payload.service_type,
            date: payload.date,
            timeslot: payload.timeslot,
            duration: payload.duration,
            price: payload.price,
            status: payload.status,
            rating: payload.rating,
            addons: payload.addons,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarDetails {
    pub make: String,
    pub model: String,
    pub year: i64,
    #[serde(rename = "type")]
    pub car_type: CarType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Basic Wash")]
    BasicWash,
    #[serde(rename = "Deluxe Wash")]
    DeluxeWash,
    #[serde(rename = "Full Detailing")]
    FullDetailing,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::BasicWash,
        ServiceType::DeluxeWash,
        ServiceType::FullDetailing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::BasicWash => "Basic Wash",
            ServiceType::DeluxeWash => "Deluxe Wash",
            ServiceType::FullDetailing => "Full Detailing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Basic Wash" => Some(ServiceType::BasicWash),
            "Deluxe Wash" => Some(ServiceType::DeluxeWash),
            "Full Detailing" => Some(ServiceType::FullDetailing),
            _ => None,
        }
    }

    /// Base price in dollars, before addons.
    pub fn base_price(&self) -> f64 {
        match self {
            ServiceType::BasicWash => 25.0,
            ServiceType::DeluxeWash => 45.0,
            ServiceType::FullDetailing => 120.0,
        }
    }

    /// Base appointment length in minutes, before addons.
    pub fn base_duration_minutes(&self) -> i64 {
        match self {
            ServiceType::BasicWash => 30,
            ServiceType::DeluxeWash => 45,
            ServiceType::FullDetailing => 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarType {
    Sedan,
    Suv,
    Hatchback,
    Luxury,
    Truck,
    Van,
}

impl CarType {
    pub const ALL: [CarType; 6] = [
        CarType::Sedan,
        CarType::Suv,
        CarType::Hatchback,
        CarType::Luxury,
        CarType::Truck,
        CarType::Van,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarType::Sedan => "sedan",
            CarType::Suv => "suv",
            CarType::Hatchback => "hatchback",
            CarType::Luxury => "luxury",
            CarType::Truck => "truck",
            CarType::Van => "van",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sedan" => Some(CarType::Sedan),
            "suv" => Some(CarType::Suv),
            "hatchback" => Some(CarType::Hatchback),
            "luxury" => Some(CarType::Luxury),
            "truck" => Some(CarType::Truck),
            "van" => Some(CarType::Van),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(BookingStatus::Pending),
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Completed" => Some(BookingStatus::Completed),
            "Cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Addon {
    #[serde(rename = "Interior Cleaning")]
    InteriorCleaning,
    #[serde(rename = "Polishing")]
    Polishing,
    #[serde(rename = "Waxing")]
    Waxing,
    #[serde(rename = "Odor Removal")]
    OdorRemoval,
    #[serde(rename = "Engine Cleaning")]
    EngineCleaning,
}

impl Addon {
    pub const ALL: [Addon; 5] = [
        Addon::InteriorCleaning,
        Addon::Polishing,
        Addon::Waxing,
        Addon::OdorRemoval,
        Addon::EngineCleaning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Addon::InteriorCleaning => "Interior Cleaning",
            Addon::Polishing => "Polishing",
            Addon::Waxing => "Waxing",
            Addon::OdorRemoval => "Odor Removal",
            Addon::EngineCleaning => "Engine Cleaning",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Interior Cleaning" => Some(Addon::InteriorCleaning),
            "Polishing" => Some(Addon::Polishing),
            "Waxing" => Some(Addon::Waxing),
            "Odor Removal" => Some(Addon::OdorRemoval),
            "Engine Cleaning" => Some(Addon::EngineCleaning),
            _ => None,
        }
    }
}
