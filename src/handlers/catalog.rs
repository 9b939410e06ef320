use axum::Json;
use serde_json::{json, Value};

use crate::constants;
use crate::models::{Addon, BookingStatus, CarType, ServiceType};

// GET /api/catalog
//
// The frontend builds its forms and price preview from this instead of
// carrying a second copy of the business constants.
pub async fn catalog() -> Json<Value> {
    let service_types: Vec<Value> = ServiceType::ALL
        .iter()
        .map(|s| {
            json!({
                "name": s.as_str(),
                "basePrice": s.base_price(),
                "baseDurationMinutes": s.base_duration_minutes(),
            })
        })
        .collect();

    let addons: Vec<Value> = Addon::ALL
        .iter()
        .map(|a| {
            json!({
                "name": a.as_str(),
                "price": constants::ADDON_PRICE,
                "durationMinutes": constants::ADDON_DURATION_MINUTES,
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "data": {
            "serviceTypes": service_types,
            "addons": addons,
            "carTypes": CarType::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "statuses": BookingStatus::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "timeslots": constants::TIME_SLOTS,
            "validation": {
                "customerName": {
                    "minLength": constants::CUSTOMER_NAME_MIN_LEN,
                    "maxLength": constants::CUSTOMER_NAME_MAX_LEN,
                },
                "carYear": {
                    "min": constants::MIN_CAR_YEAR,
                    "max": constants::max_car_year(),
                },
                "minDurationMinutes": constants::MIN_DURATION_MINUTES,
                "rating": {
                    "min": constants::MIN_RATING,
                    "max": constants::MAX_RATING,
                },
            },
        },
    }))
}
