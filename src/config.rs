use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub news_api_key: String,
    pub news_api_url: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub summary_concurrency: usize,
    pub summary_timeout: Duration,
    pub pipeline_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("news_api_key", &"<redacted>")
            .field("news_api_url", &self.news_api_url)
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_model", &self.openai_model)
            .field("openai_temperature", &self.openai_temperature)
            .field("summary_concurrency", &self.summary_concurrency)
            .field("summary_timeout", &self.summary_timeout)
            .field("pipeline_timeout", &self.pipeline_timeout)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Both API keys are required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let news_api_key = required(&lookup, "NEWS_API_KEY")?;
        let openai_api_key = required(&lookup, "OPENAI_API_KEY")?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let openai_temperature = parsed(&lookup, "OPENAI_TEMPERATURE", 0.3_f32)?;
        let summary_concurrency = parsed(&lookup, "SUMMARY_CONCURRENCY", 4_usize)?.max(1);
        let summary_timeout_secs = parsed(&lookup, "SUMMARY_TIMEOUT_SECS", 30_u64)?;
        let timeout_secs = parsed(&lookup, "PIPELINE_TIMEOUT_SECS", 90_u64)?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            news_api_key,
            news_api_url: lookup("NEWS_API_URL").unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
            openai_api_key,
            openai_api_url: lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_temperature,
            summary_concurrency,
            summary_timeout: Duration::from_secs(summary_timeout_secs),
            pipeline_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::ConfigError(format!("{} not found in environment", key))),
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
