//! Fixed-window request counters, kept in memory per client key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;
use crate::state::AppState;

// Above this many tracked clients, expired windows are swept on the next hit.
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    max: u32,
    window: Duration,
    counters: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request against `key`. Returns false once the window quota
    /// is spent; the window resets after it elapses.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut counters = self.counters.lock().unwrap();

        if counters.len() > SWEEP_THRESHOLD {
            let window = self.window;
            counters.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = counters.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max {
            false
        } else {
            entry.count += 1;
            true
        }
    }
}

/// Client identity for quota purposes: first X-Forwarded-For hop when behind
/// a proxy, otherwise one shared bucket.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Router middleware enforcing the general API quota.
pub async fn limit_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers());
    if !state.api_limiter.try_acquire(&key) {
        tracing::warn!(client = %key, "API rate limit exceeded");
        return AppError::RateLimited("Too many requests, please try again later".to_string())
            .into_response();
    }
    next.run(request).await
}
