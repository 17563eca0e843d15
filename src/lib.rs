pub mod agent;
pub mod api;
pub mod article;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod summarizer;

use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use agent::NewsAgent;
use config::Config;

// Shared client so both external APIs reuse pooled connections
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent: Arc<NewsAgent>,
}

impl AppState {
    /// Builds the long-lived pipeline from configuration.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let agent = NewsAgent::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            agent: Arc::new(agent),
        })
    }
}
