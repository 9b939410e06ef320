//! Request sanitization and field validation for booking payloads.
//!
//! Runs against the raw JSON body before it is deserialized into a typed
//! payload, so every violation can be reported with its field path and the
//! rejected value instead of a single opaque deserialization error. Closed
//! sets are ordinary membership tests against the enum parsers.

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants;
use crate::errors::FieldError;
use crate::models::{Addon, BookingStatus, CarType, ServiceType};

/// Trim the free-text fields and lowercase the car type, in place.
/// Applied before [`validate`].
pub fn sanitize(payload: &mut Value) {
    trim_in_place(payload, "customerName");
    trim_in_place(payload, "serviceType");

    if let Some(car_details) = payload.get_mut("carDetails") {
        trim_in_place(car_details, "make");
        trim_in_place(car_details, "model");

        if let Some(Value::String(car_type)) = car_details.get_mut("type") {
            *car_type = car_type.to_lowercase();
        }
    }
}

fn trim_in_place(value: &mut Value, key: &str) {
    if let Some(Value::String(s)) = value.get_mut(key) {
        *s = s.trim().to_string();
    }
}

/// Check every rule and collect every violation. A payload that passes here
/// is guaranteed to deserialize into a `BookingPayload`.
pub fn validate(payload: &Value) -> Result<(), Vec<FieldError>> {
    let mut errors = vec![];

    match payload.get("customerName").and_then(Value::as_str) {
        None | Some("") => errors.push(FieldError::new(
            "customerName",
            "Customer name is required",
            field_value(payload, "customerName"),
        )),
        Some(name) if name.chars().count() < constants::CUSTOMER_NAME_MIN_LEN => {
            errors.push(FieldError::new(
                "customerName",
                format!(
                    "Customer name must be at least {} characters",
                    constants::CUSTOMER_NAME_MIN_LEN
                ),
                field_value(payload, "customerName"),
            ));
        }
        Some(name) if name.chars().count() > constants::CUSTOMER_NAME_MAX_LEN => {
            errors.push(FieldError::new(
                "customerName",
                format!(
                    "Customer name must be at most {} characters",
                    constants::CUSTOMER_NAME_MAX_LEN
                ),
                field_value(payload, "customerName"),
            ));
        }
        Some(_) => {}
    }

    let car_details = payload.get("carDetails").unwrap_or(&Value::Null);

    if car_details
        .get("make")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty)
    {
        errors.push(FieldError::new(
            "carDetails.make",
            "Car make is required",
            field_value(car_details, "make"),
        ));
    }

    if car_details
        .get("model")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty)
    {
        errors.push(FieldError::new(
            "carDetails.model",
            "Car model is required",
            field_value(car_details, "model"),
        ));
    }

    let max_year = constants::max_car_year();
    match car_details.get("year").and_then(Value::as_i64) {
        Some(year) if (constants::MIN_CAR_YEAR..=max_year).contains(&year) => {}
        _ => errors.push(FieldError::new(
            "carDetails.year",
            format!(
                "Car year must be between {} and {max_year}",
                constants::MIN_CAR_YEAR
            ),
            field_value(car_details, "year"),
        )),
    }

    if car_details
        .get("type")
        .and_then(Value::as_str)
        .and_then(CarType::parse)
        .is_none()
    {
        errors.push(FieldError::new(
            "carDetails.type",
            "Car type must be one of: sedan, suv, hatchback, luxury, truck, van",
            field_value(car_details, "type"),
        ));
    }

    if payload
        .get("serviceType")
        .and_then(Value::as_str)
        .and_then(ServiceType::parse)
        .is_none()
    {
        errors.push(FieldError::new(
            "serviceType",
            "Service type must be one of: Basic Wash, Deluxe Wash, Full Detailing",
            field_value(payload, "serviceType"),
        ));
    }

    if payload
        .get("date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .is_none()
    {
        errors.push(FieldError::new(
            "date",
            "Valid date is required",
            field_value(payload, "date"),
        ));
    }

    if payload
        .get("timeslot")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty)
    {
        errors.push(FieldError::new(
            "timeslot",
            "Timeslot is required",
            field_value(payload, "timeslot"),
        ));
    }

    match payload.get("duration").and_then(Value::as_i64) {
        Some(duration) if duration >= constants::MIN_DURATION_MINUTES => {}
        _ => errors.push(FieldError::new(
            "duration",
            format!(
                "Minimum duration is {} minutes",
                constants::MIN_DURATION_MINUTES
            ),
            field_value(payload, "duration"),
        )),
    }

    match payload.get("price").and_then(Value::as_f64) {
        Some(price) if price >= 0.0 => {}
        _ => errors.push(FieldError::new(
            "price",
            "Price cannot be negative",
            field_value(payload, "price"),
        )),
    }

    // Optional fields may be absent, but once present they must be in
    // range. An explicit null status or addons list is a violation, not an
    // omission: the typed payload has no null form for either.
    if let Some(status) = payload.get("status") {
        if status
            .as_str()
            .and_then(BookingStatus::parse)
            .is_none()
        {
            errors.push(FieldError::new(
                "status",
                "Status must be one of: Pending, Confirmed, Completed, Cancelled",
                status.clone(),
            ));
        }
    }

    // Rating alone tolerates null: an unrated booking stores none.
    if let Some(rating) = payload.get("rating").filter(|v| !v.is_null()) {
        match rating.as_i64() {
            Some(r) if (constants::MIN_RATING..=constants::MAX_RATING).contains(&r) => {}
            _ => errors.push(FieldError::new(
                "rating",
                format!(
                    "Rating must be between {} and {}",
                    constants::MIN_RATING,
                    constants::MAX_RATING
                ),
                rating.clone(),
            )),
        }
    }

    if let Some(addons) = payload.get("addons") {
        match addons.as_array() {
            None => errors.push(FieldError::new(
                "addons",
                "Addons must be an array",
                addons.clone(),
            )),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.as_str().and_then(Addon::parse).is_none() {
                        errors.push(FieldError::new(
                            &format!("addons[{i}]"),
                            "Addon must be one of: Interior Cleaning, Polishing, Waxing, \
                             Odor Removal, Engine Cleaning",
                            item.clone(),
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn field_value(parent: &Value, key: &str) -> Value {
    parent.get(key).cloned().unwrap_or(Value::Null)
}
