use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Full-week plans are larger outputs and get a longer deadline.
    pub meal_plan_timeout: Duration,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout: Duration::from_secs(30),
            meal_plan_timeout: Duration::from_secs(45),
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub generation: GenerationConfig,
    pub image_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = format!(
            "{}:{}",
            std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
        )
        .parse()
        .context("APP_HOST/APP_PORT do not form a socket address")?;
        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            base_url: std::env::var("GENERATION_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GENERATION_MODEL").unwrap_or(defaults.model),
            temperature: env_or("GENERATION_TEMPERATURE", defaults.temperature),
            max_tokens: env_or("GENERATION_MAX_TOKENS", defaults.max_tokens),
            timeout: env_secs("GENERATION_TIMEOUT_SECS", defaults.timeout),
            meal_plan_timeout: env_secs("MEAL_PLAN_TIMEOUT_SECS", defaults.meal_plan_timeout),
            retry_attempts: env_or("GENERATION_RETRY_ATTEMPTS", defaults.retry_attempts),
            retry_backoff: std::env::var("GENERATION_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_backoff),
        };
        let image_base_url = std::env::var("IMAGE_BASE_URL")
            .unwrap_or_else(|_| "https://image.pollinations.ai/prompt/".into());
        Ok(Self {
            database_url,
            bind_addr,
            generation,
            image_base_url,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
