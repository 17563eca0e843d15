use std::sync::Arc;
use std::time::Duration;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::article::{ClassifiedArticle, ProcessedArticle};
use crate::error::{AppError, Result};
use crate::llm::TextGenerator;

/// Upper bound for a single model call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Descriptions longer than this many characters get summarized.
pub const SUMMARY_THRESHOLD: usize = 200;

pub const SUMMARY_INSTRUCTION: &str = "You are an expert news summarizer. \
Write a concise, clear summary of at most 150 characters that captures the key points of the story.";

pub fn needs_summary(description: &str) -> bool {
    description.chars().count() > SUMMARY_THRESHOLD
}

pub fn build_prompt(description: &str) -> String {
    let mut result = String::with_capacity(description.len() + 32);
    result.push_str("Summarize this news story: ");
    result.push_str(description);
    result
}

/// Summarization stage over a shared text generator.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    concurrency: usize,
    call_timeout: Duration,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, concurrency: usize) -> Self {
        Self {
            generator,
            concurrency: concurrency.max(1),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Produces the final article. A failed or timed-out model call keeps the
    /// original description.
    pub async fn process_article(&self, article: ClassifiedArticle) -> ProcessedArticle {
        self.process_article_until(article, None).await
    }

    async fn process_article_until(
        &self,
        article: ClassifiedArticle,
        deadline: Option<Instant>,
    ) -> ProcessedArticle {
        if !needs_summary(&article.description) {
            let description = article.description.clone();
            return ProcessedArticle::from_classified(article, description);
        }

        match self.request_summary(&article.description, deadline).await {
            Ok(summary) => ProcessedArticle::from_classified(article, summary.trim().to_string()),
            Err(err) => {
                warn!(error = %err, url = %article.url, "Failed to summarize article, keeping original description");
                let description = article.description.clone();
                ProcessedArticle::from_classified(article, description)
            }
        }
    }

    async fn request_summary(&self, description: &str, deadline: Option<Instant>) -> Result<String> {
        let budget = match deadline {
            Some(deadline) => self
                .call_timeout
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.call_timeout,
        };
        if budget.is_zero() {
            return Err(AppError::LlmError("no time left for summarization".to_string()));
        }

        let prompt = build_prompt(description);
        tokio::time::timeout(budget, self.generator.generate(SUMMARY_INSTRUCTION, &prompt))
            .await
            .map_err(|_| AppError::LlmError(format!("summary request timed out after {:?}", budget)))?
    }

    /// Runs every article through [`Summarizer::process_article`]. Output order
    /// matches input order.
    pub async fn summarize(&self, articles: Vec<ClassifiedArticle>) -> Vec<ProcessedArticle> {
        self.summarize_until(articles, None).await
    }

    /// Like [`Summarizer::summarize`], but no model call runs past `deadline`.
    /// Articles that run out of time keep their original description.
    pub async fn summarize_until(
        &self,
        articles: Vec<ClassifiedArticle>,
        deadline: Option<Instant>,
    ) -> Vec<ProcessedArticle> {
        let pending = articles
            .iter()
            .filter(|article| needs_summary(&article.description))
            .count();

        let processed: Vec<ProcessedArticle> = stream::iter(articles)
            .map(|article| self.process_article_until(article, deadline))
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(count = processed.len(), summarized = pending, "Processed final articles");
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Category;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedReply {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for FixedReply {
        async fn generate(&self, _instruction: &str, _input: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl TextGenerator for AlwaysFails {
        async fn generate(&self, _instruction: &str, _input: &str) -> Result<String> {
            Err(AppError::LlmError("quota exceeded".to_string()))
        }
    }

    /// Fails only for inputs mentioning "poison".
    struct FailsOnPoison;

    #[async_trait]
    impl TextGenerator for FailsOnPoison {
        async fn generate(&self, _instruction: &str, input: &str) -> Result<String> {
            if input.contains("poison") {
                Err(AppError::LlmError("boom".to_string()))
            } else {
                Ok("summary".to_string())
            }
        }
    }

    /// Sleeps before answering.
    struct SlowReply(Duration);

    #[async_trait]
    impl TextGenerator for SlowReply {
        async fn generate(&self, _instruction: &str, _input: &str) -> Result<String> {
            tokio::time::sleep(self.0).await;
            Ok("late summary".to_string())
        }
    }

    fn article(title: &str, description: String) -> ClassifiedArticle {
        ClassifiedArticle {
            title: title.to_string(),
            description,
            url: format!("https://example.com/{}", title),
            image_url: None,
            published_at: "2024-05-01T10:00:00Z".to_string(),
            source_name: "Example".to_string(),
            category: Category::Ai,
        }
    }

    fn fixed(reply: &'static str) -> Arc<FixedReply> {
        Arc::new(FixedReply {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        assert!(!needs_summary(&"a".repeat(200)));
        assert!(needs_summary(&"a".repeat(201)));
        // 200 multi-byte characters stay under the threshold
        assert!(!needs_summary(&"é".repeat(200)));
    }

    #[tokio::test]
    async fn short_descriptions_pass_through_without_a_call() {
        let generator = fixed("unused");
        let summarizer = Summarizer::new(generator.clone(), 4);
        let description = "x".repeat(200);

        let out = summarizer.summarize(vec![article("short", description.clone())]).await;

        assert_eq!(out[0].description, description);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn long_descriptions_are_replaced_by_trimmed_summary() {
        let generator = fixed("  A tight summary.  ");
        let summarizer = Summarizer::new(generator.clone(), 4);

        let out = summarizer.summarize(vec![article("long", "y".repeat(250))]).await;

        assert_eq!(out[0].description, "A tight summary.");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_call_keeps_original_description() {
        let summarizer = Summarizer::new(Arc::new(AlwaysFails), 4);
        let original = "z".repeat(300);

        let out = summarizer.summarize(vec![article("long", original.clone())]).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, original);
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_siblings() {
        let summarizer = Summarizer::new(Arc::new(FailsOnPoison), 2);
        let poisoned = format!("poison {}", "p".repeat(250));

        let out = summarizer
            .summarize(vec![
                article("first", "q".repeat(250)),
                article("second", poisoned.clone()),
                article("third", "tiny".to_string()),
            ])
            .await;

        let titles: Vec<_> = out.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
        assert_eq!(out[0].description, "summary");
        assert_eq!(out[1].description, poisoned);
        assert_eq!(out[2].description, "tiny");
    }

    #[tokio::test]
    async fn category_and_placeholder_are_carried_over() {
        let summarizer = Summarizer::new(fixed("s"), 1);
        let out = summarizer.summarize(vec![article("a", "short".to_string())]).await;

        assert_eq!(out[0].category, Category::Ai);
        assert_eq!(out[0].image, crate::article::PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn slow_call_times_out_and_keeps_original() {
        let summarizer = Summarizer::new(Arc::new(SlowReply(Duration::from_millis(200))), 1)
            .with_call_timeout(Duration::from_millis(20));
        let original = "w".repeat(260);

        let out = summarizer.summarize(vec![article("slow", original.clone())]).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, original);
    }

    #[tokio::test]
    async fn deadline_keeps_every_article() {
        let summarizer = Summarizer::new(Arc::new(SlowReply(Duration::from_millis(100))), 1);
        let articles: Vec<_> = (0..8)
            .map(|i| article(&format!("story-{}", i), "v".repeat(250)))
            .collect();
        let deadline = Instant::now() + Duration::from_millis(350);

        let out = summarizer.summarize_until(articles, Some(deadline)).await;

        assert_eq!(out.len(), 8);
        assert_eq!(out[0].description, "late summary");
        assert_eq!(out[7].description, "v".repeat(250));
    }
}
