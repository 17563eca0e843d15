use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::article::RawArticle;
use crate::error::{AppError, Result};
use crate::HTTP_CLIENT;

/// Maximum number of articles requested from the search API.
pub const PAGE_SIZE: usize = 20;

/// Anything that can turn a keyword query into raw articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSource>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

#[derive(Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(article: NewsApiArticle) -> Self {
        RawArticle {
            title: article.title.unwrap_or_default(),
            description: article.description.unwrap_or_default(),
            content: article.content.unwrap_or_default(),
            url: article.url.unwrap_or_default(),
            image_url: article.url_to_image.filter(|url| !url.is_empty()),
            published_at: article.published_at.unwrap_or_default(),
            source_name: article
                .source
                .and_then(|source| source.name)
                .unwrap_or_default(),
        }
    }
}

/// Client for the NewsAPI `/v2/everything` endpoint.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>> {
        let page_size = PAGE_SIZE.to_string();
        debug!(query, page_size = PAGE_SIZE, "Querying NewsAPI");

        let response = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::FetchError(format!(
                "NewsAPI returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: EverythingResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(AppError::FetchError(format!(
                "NewsAPI error {}: {}",
                body.code.as_deref().unwrap_or("unknown"),
                body.message.as_deref().unwrap_or("no message")
            )));
        }

        Ok(body
            .articles
            .into_iter()
            .take(PAGE_SIZE)
            .map(RawArticle::from)
            .collect())
    }
}

/// Fetch stage: never fails, an unreachable or misbehaving source yields an
/// empty batch.
pub async fn fetch_articles(source: &dyn ArticleSource, query: &str) -> Vec<RawArticle> {
    match source.search(query).await {
        Ok(articles) => {
            info!(count = articles.len(), "Fetched articles from news source");
            articles
        }
        Err(err) => {
            error!(error = %err, query, "Failed to fetch news, continuing with an empty batch");
            Vec::new()
        }
    }
}
