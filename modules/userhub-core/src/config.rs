use anyhow::Result;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,

    /// Port serving both request/response and subscription traffic.
    pub port: u16,

    /// Per-subscription delivery queue capacity. Unset means unbounded;
    /// when set, a full queue drops its oldest event to make room.
    pub channel_queue_capacity: Option<usize>,

    /// CORS allowlist. Empty means permissive.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            channel_queue_capacity: std::env::var("CHANNEL_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok()),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}
