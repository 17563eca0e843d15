use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, instrument};

use crate::article::ProcessedArticle;
use crate::classifier::classify;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetcher::{fetch_articles, ArticleSource, NewsApiClient};
use crate::llm::{OpenAiClient, TextGenerator};
use crate::summarizer::Summarizer;

const DEFAULT_PIPELINE_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_SUMMARY_CONCURRENCY: usize = 4;

/// Fetch → classify → summarize pipeline. Built once at startup and shared
/// by every request.
#[derive(Clone)]
pub struct NewsAgent {
    source: Arc<dyn ArticleSource>,
    summarizer: Summarizer,
    timeout: Duration,
}

impl NewsAgent {
    pub fn new(source: Arc<dyn ArticleSource>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            source,
            summarizer: Summarizer::new(generator, DEFAULT_SUMMARY_CONCURRENCY),
            timeout: DEFAULT_PIPELINE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_summary_concurrency(mut self, concurrency: usize) -> Self {
        self.summarizer = self.summarizer.with_concurrency(concurrency);
        self
    }

    pub fn with_summary_timeout(mut self, call_timeout: Duration) -> Self {
        self.summarizer = self.summarizer.with_call_timeout(call_timeout);
        self
    }

    /// Wires the NewsAPI and OpenAI clients from configuration. Fails when
    /// either credential is blank.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.news_api_key.trim().is_empty() {
            return Err(AppError::ConfigError("NEWS_API_KEY not found in environment".to_string()));
        }
        if config.openai_api_key.trim().is_empty() {
            return Err(AppError::ConfigError("OPENAI_API_KEY not found in environment".to_string()));
        }

        let source = NewsApiClient::new(config.news_api_key.clone(), config.news_api_url.clone());
        let generator = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
            config.openai_temperature,
        );

        Ok(Self::new(Arc::new(source), Arc::new(generator))
            .with_summary_concurrency(config.summary_concurrency)
            .with_summary_timeout(config.summary_timeout)
            .with_timeout(config.pipeline_timeout))
    }

    /// Runs the three stages in sequence. Fails only when fetching does not
    /// finish before the pipeline deadline; once articles are in hand, the
    /// deadline merely stops further model calls and the remaining articles
    /// keep their original descriptions.
    #[instrument(skip(self))]
    pub async fn run(&self, query: &str) -> Result<Vec<ProcessedArticle>> {
        info!("Starting news search");
        let deadline = Instant::now() + self.timeout;

        let raw = tokio::time::timeout_at(deadline, fetch_articles(self.source.as_ref(), query))
            .await
            .map_err(|_| {
                AppError::OrchestrationError(format!(
                    "news fetch did not finish within {:?}",
                    self.timeout
                ))
            })?;
        let classified = classify(raw);

        Ok(self.summarizer.summarize_until(classified, Some(deadline)).await)
    }

    /// Like [`NewsAgent::run`], but an orchestration failure yields an empty
    /// list.
    pub async fn get_filtered_news(&self, query: &str) -> Vec<ProcessedArticle> {
        match self.run(query).await {
            Ok(news) => news,
            Err(err) => {
                error!(error = %err, query, "News agent failed");
                Vec::new()
            }
        }
    }
}
