use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// News API key
    pub news_api_key: String,

    /// News API base URL
    #[serde(default = "default_news_api_url")]
    pub news_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of articles returned by /recommended when no limit is given
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_news_api_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
