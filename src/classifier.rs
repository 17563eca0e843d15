//! Keyword relevance filter.
//!
//! Matching is plain substring containment over the lowercased
//! `title description content` text, so "campaigning" counts as "campaign"
//! and "said" counts as "ai".

use tracing::{debug, info};

use crate::article::{Category, ClassifiedArticle, RawArticle};

pub const AI_TERMS: [&str; 5] = [
    "artificial intelligence",
    "ai",
    "machine learning",
    "deep learning",
    "neural network",
];

pub const MARKETING_TERMS: [&str; 5] = [
    "marketing",
    "advertising",
    "campaign",
    "brand",
    "customer",
];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Lowercased buffer the term sets are matched against.
pub fn searchable_text(title: &str, description: &str, content: &str) -> String {
    format!("{} {} {}", title, description, content).to_lowercase()
}

/// Maps already-lowercased text to a category, or `None` when neither term
/// set matches.
pub fn categorize(text: &str) -> Option<Category> {
    match (contains_any(text, &AI_TERMS), contains_any(text, &MARKETING_TERMS)) {
        (true, true) => Some(Category::Both),
        (true, false) => Some(Category::Ai),
        (false, true) => Some(Category::Marketing),
        (false, false) => None,
    }
}

pub fn classify_article(article: RawArticle) -> Option<ClassifiedArticle> {
    let text = searchable_text(&article.title, &article.description, &article.content);
    match categorize(&text) {
        Some(category) => Some(ClassifiedArticle::from_raw(article, category)),
        None => {
            debug!(title = %article.title, "Dropping article with no matching terms");
            None
        }
    }
}

/// Classification stage. Keeps input order and never adds articles.
pub fn classify(articles: Vec<RawArticle>) -> Vec<ClassifiedArticle> {
    let total = articles.len();
    let classified: Vec<ClassifiedArticle> = articles
        .into_iter()
        .filter_map(classify_article)
        .collect();

    info!(kept = classified.len(), total, "Filtered relevant articles");
    classified
}
