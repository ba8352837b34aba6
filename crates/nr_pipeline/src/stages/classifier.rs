use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use nr_core::{Categorizer, Category, Error, Result, TextGenerator, ToolSet};

/// Categorization over the text generator.
///
/// The model may reply with anything; the stage matches the reply against
/// the closed category set and never lets raw model text escape.
pub struct NewsClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl NewsClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn prompt(title: &str, summary: &str) -> String {
        let labels: Vec<&str> = Category::CLASSIFIABLE.iter().map(|c| c.as_str()).collect();
        format!(
            "Please classify the following news article into one of these categories: {}.\n\nTitle: {title}\nSummary: {summary}",
            labels.join(", ")
        )
    }

    /// Case-insensitive substring match in priority order; no hit means
    /// `General`.
    fn match_category(reply: &str) -> Category {
        let lowered = reply.to_lowercase();
        for category in Category::CLASSIFIABLE {
            if lowered.contains(&category.as_str().to_lowercase()) {
                return category;
            }
        }
        Category::General
    }
}

#[async_trait]
impl Categorizer for NewsClassifier {
    async fn categorize(&self, title: &str, summary: &str) -> Result<Category> {
        if title.trim().is_empty() {
            return Err(Error::MissingField("title"));
        }
        if summary.trim().is_empty() {
            return Err(Error::MissingField("summary"));
        }

        debug!(title, "classifying article");
        match self
            .generator
            .generate(&Self::prompt(title, summary), &ToolSet::new())
            .await
        {
            Ok(reply) => Ok(Self::match_category(&reply)),
            Err(e) => {
                warn!(title, error = %e, "classification failed; falling back to General");
                Ok(Category::General)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_inference::ScriptedModel;

    fn classifier(responses: Vec<&str>) -> NewsClassifier {
        NewsClassifier::new(Arc::new(ScriptedModel::new(responses)))
    }

    #[tokio::test]
    async fn matches_labels_case_insensitively_inside_prose() {
        let classifier = classifier(vec![
            "This article is clearly about TECHNOLOGY trends in the industry.",
        ]);
        let category = classifier.categorize("t", "s").await.unwrap();
        assert_eq!(category, Category::Technology);
    }

    #[tokio::test]
    async fn first_label_in_priority_order_wins() {
        // Reply mentions both sports and politics; Politics is listed first.
        let classifier = classifier(vec!["Could be Sports, could be Politics."]);
        let category = classifier.categorize("t", "s").await.unwrap();
        assert_eq!(category, Category::Politics);
    }

    #[tokio::test]
    async fn unmatched_replies_become_general() {
        let classifier = classifier(vec!["I have no idea what this is."]);
        let category = classifier.categorize("t", "s").await.unwrap();
        assert_eq!(category, Category::General);
    }

    #[tokio::test]
    async fn generator_failure_becomes_general() {
        let classifier = classifier(vec![]);
        let category = classifier.categorize("t", "s").await.unwrap();
        assert_eq!(category, Category::General);
    }

    #[tokio::test]
    async fn missing_fields_are_contract_errors() {
        let classifier = classifier(vec!["Technology"]);
        assert!(matches!(
            classifier.categorize("", "s").await,
            Err(Error::MissingField("title"))
        ));
        assert!(matches!(
            classifier.categorize("t", "  ").await,
            Err(Error::MissingField("summary"))
        ));
    }
}
