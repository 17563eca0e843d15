use serde::{Deserialize, Serialize};

use crate::article::ProcessedArticle;

fn default_filter() -> String {
    "both".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_filter")]
    pub filter_type: String,
}

/// Filter selected in the UI. Unknown values fall back to `Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Ai,
    Marketing,
    Both,
}

impl FilterType {
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "ai" => FilterType::Ai,
            "marketing" => FilterType::Marketing,
            _ => FilterType::Both,
        }
    }

    /// Search query sent to the news API for this filter.
    pub fn query(&self) -> &'static str {
        match self {
            FilterType::Ai => "artificial intelligence",
            FilterType::Marketing => "marketing",
            FilterType::Both => "artificial intelligence AND marketing",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub status: String,
    pub filter: String,
    pub count: usize,
    pub news: Vec<ProcessedArticle>,
}

impl NewsResponse {
    pub fn success(filter: String, news: Vec<ProcessedArticle>) -> Self {
        Self {
            status: "success".to_string(),
            filter,
            count: news.len(),
            news,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}
