use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub environment: String,
    pub allowed_origins: Vec<String>,
    pub api_rate_limit: u32,
    pub api_rate_window_secs: u64,
    pub create_rate_limit: u32,
    pub create_rate_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "carwash.db".to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            api_rate_limit: env::var("API_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            api_rate_window_secs: env::var("API_RATE_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15 * 60),
            create_rate_limit: env::var("CREATE_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            create_rate_window_secs: env::var("CREATE_RATE_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 60),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
