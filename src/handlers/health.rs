use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let total_bookings = {
        let db = state.db.lock().unwrap();
        queries::count_bookings(&db).map_err(|e| {
            tracing::error!(error = %e, "health check database probe failed");
            AppError::ServiceUnavailable(e.to_string())
        })?
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
            "uptimeSecs": state.started_at.elapsed().as_secs(),
            "environment": state.config.environment,
            "database": {
                "status": "connected",
                "totalBookings": total_bookings,
            },
            "application": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        },
    })))
}
