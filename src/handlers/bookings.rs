use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::constants;
use crate::db::queries::{self, BookingFilter};
use crate::errors::AppError;
use crate::models::booking::timestamp_now;
use crate::models::{Booking, BookingPayload};
use crate::services::{rate_limit, validation};
use crate::state::AppState;

// GET /api/bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub service_type: Option<String>,
    pub car_type: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // page below 1 would turn into a negative skip; clamp instead
    let page = query.page.unwrap_or(constants::DEFAULT_PAGE).max(1);
    let limit = query
        .limit
        .unwrap_or(constants::DEFAULT_LIMIT)
        .clamp(1, constants::MAX_LIMIT);

    let filter = BookingFilter {
        service_type: query.service_type,
        car_type: query.car_type,
        status: query.status,
        date_from: parse_date_param(query.date_from.as_deref(), "dateFrom")?,
        date_to: parse_date_param(query.date_to.as_deref(), "dateTo")?,
    };

    let (bookings, total) = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db, &filter, page, limit)?
    };

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(json!({
        "success": true,
        "data": bookings,
        "pagination": {
            "current": page,
            "total": total_pages,
            "totalBookings": total,
        },
    })))
}

fn parse_date_param(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {name}, expected YYYY-MM-DD"))),
    }
}

// GET /api/bookings/search
#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::search_bookings(&db, q)?
    };

    Ok(Json(json!({ "success": true, "data": bookings })))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

    Ok(Json(json!({ "success": true, "data": booking })))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(mut body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let client = rate_limit::client_key(&headers);
    if !state.create_limiter.try_acquire(&client) {
        tracing::warn!(client = %client, "booking creation rate limit exceeded");
        return Err(AppError::RateLimited(
            "Too many bookings created, please try again later".to_string(),
        ));
    }

    let payload = sanitize_and_validate(&mut body)?;
    let booking = Booking::from_payload(Uuid::new_v4().to_string(), payload, timestamp_now());

    {
        let db = state.db.lock().unwrap();
        queries::insert_booking(&db, &booking)?;
    }

    tracing::info!(id = %booking.id, customer = %booking.customer_name, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Booking created successfully",
            "data": booking,
        })),
    ))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(mut body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let payload = sanitize_and_validate(&mut body)?;

    let booking = {
        let db = state.db.lock().unwrap();
        if !queries::update_booking(&db, &id, &payload, timestamp_now())? {
            return Err(AppError::NotFound("Booking".to_string()));
        }
        queries::get_booking_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

    tracing::info!(id = %id, "booking updated");

    Ok(Json(json!({
        "success": true,
        "message": "Booking updated successfully",
        "data": booking,
    })))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let removed = {
        let db = state.db.lock().unwrap();
        queries::delete_booking(&db, &id)?
    };

    if !removed {
        return Err(AppError::NotFound("Booking".to_string()));
    }

    tracing::info!(id = %id, "booking deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Booking deleted successfully",
    })))
}

fn sanitize_and_validate(body: &mut Value) -> Result<BookingPayload, AppError> {
    validation::sanitize(body);
    validation::validate(body).map_err(AppError::Validation)?;

    // A payload that passed validation deserializes cleanly; anything else
    // is a bug in the validator, not bad input.
    let payload = serde_json::from_value(body.clone())
        .map_err(|e| anyhow::anyhow!("validated payload failed to deserialize: {e}"))?;
    Ok(payload)
}
