use std::sync::{Arc, Mutex};
use std::time::Instant;

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::rate_limit::RateLimiter;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub started_at: Instant,
    /// General per-client cap across the whole API.
    pub api_limiter: RateLimiter,
    /// Tighter per-client cap on booking creation.
    pub create_limiter: RateLimiter,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let api_limiter = RateLimiter::new(
            config.api_rate_limit,
            std::time::Duration::from_secs(config.api_rate_window_secs),
        );
        let create_limiter = RateLimiter::new(
            config.create_rate_limit,
            std::time::Duration::from_secs(config.create_rate_window_secs),
        );
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            started_at: Instant::now(),
            api_limiter,
            create_limiter,
        }
    }
}
