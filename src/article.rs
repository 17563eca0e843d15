use serde::{Deserialize, Serialize};
use std::fmt;

/// Image path served to the UI when an article carries no image.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/300/200";

/// Topical bucket an article lands in after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ai,
    Marketing,
    Both,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::Marketing => "marketing",
            Category::Both => "both",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article as returned by the search API, normalized so that absent text
/// fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
    pub source_name: String,
}

/// A raw article that matched at least one term set. `content` is dropped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
    pub source_name: String,
    pub category: Category,
}

impl ClassifiedArticle {
    pub fn from_raw(raw: RawArticle, category: Category) -> Self {
        Self {
            title: raw.title,
            description: raw.description,
            url: raw.url,
            image_url: raw.image_url,
            published_at: raw.published_at,
            source_name: raw.source_name,
            category,
        }
    }
}

/// Final article handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub source: String,
    pub category: Category,
}

impl ProcessedArticle {
    /// Builds the terminal record, swapping in `description` and defaulting
    /// the image to [`PLACEHOLDER_IMAGE`].
    pub fn from_classified(article: ClassifiedArticle, description: String) -> Self {
        Self {
            title: article.title,
            description,
            url: article.url,
            image: article
                .image_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            published_at: article.published_at,
            source: article.source_name,
            category: article.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(image_url: Option<&str>) -> ClassifiedArticle {
        ClassifiedArticle {
            title: "Brand lift".to_string(),
            description: "short".to_string(),
            url: "https://example.com/a".to_string(),
            image_url: image_url.map(str::to_string),
            published_at: "2024-05-01T10:00:00Z".to_string(),
            source_name: "Example".to_string(),
            category: Category::Marketing,
        }
    }

    #[test]
    fn missing_image_falls_back_to_placeholder() {
        let article = ProcessedArticle::from_classified(classified(None), "short".into());
        assert_eq!(article.image, PLACEHOLDER_IMAGE);

        let article = ProcessedArticle::from_classified(classified(Some("")), "short".into());
        assert_eq!(article.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn processed_article_uses_ui_field_names() {
        let article = ProcessedArticle::from_classified(
            classified(Some("https://cdn.example.com/x.png")),
            "short".into(),
        );
        let json = serde_json::to_value(&article).unwrap();

        assert_eq!(json["publishedAt"], "2024-05-01T10:00:00Z");
        assert_eq!(json["source"], "Example");
        assert_eq!(json["image"], "https://cdn.example.com/x.png");
        assert_eq!(json["category"], "marketing");
    }
}
