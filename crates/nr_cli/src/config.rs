use std::env;

use tracing::Level;

/// Daily at 09:00 (seconds, minutes, hours, day-of-month, month, day-of-week).
pub const DEFAULT_SCHEDULE: &str = "0 0 9 * * *";

/// Runtime settings, all taken from `NEWSROOM_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub model_url: Option<String>,
    pub storage_path: String,
    pub schedule: String,
    pub default_topic: String,
    pub max_articles: usize,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("NEWSROOM_API_KEY").ok(),
            model: env::var("NEWSROOM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            model_url: env::var("NEWSROOM_MODEL_URL").ok(),
            storage_path: env::var("NEWSROOM_STORAGE")
                .unwrap_or_else(|_| "data/news.json".to_string()),
            schedule: env::var("NEWSROOM_SCHEDULE").unwrap_or_else(|_| DEFAULT_SCHEDULE.to_string()),
            default_topic: env::var("NEWSROOM_TOPIC")
                .unwrap_or_else(|_| "artificial intelligence".to_string()),
            max_articles: env::var("NEWSROOM_MAX_ARTICLES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: env::var("NEWSROOM_LOG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Level::INFO),
        }
    }
}
