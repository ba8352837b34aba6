use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Sentinel summary for articles that arrive without one.
pub const NOT_SUMMARIZED: &str = "Not summarized.";

/// The closed set of labels an article can carry.
///
/// `Uncategorized` is the pre-classification default; `General` is what the
/// classifier falls back to when no fixed label matches its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Politics,
    Technology,
    Sports,
    Finance,
    Entertainment,
    World,
    Health,
    General,
    Uncategorized,
}

impl Category {
    /// Labels the classifier may assign, in matching priority order.
    pub const CLASSIFIABLE: [Category; 7] = [
        Category::Politics,
        Category::Technology,
        Category::Sports,
        Category::Finance,
        Category::Entertainment,
        Category::World,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Politics => "Politics",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Finance => "Finance",
            Category::Entertainment => "Entertainment",
            Category::World => "World",
            Category::Health => "Health",
            Category::General => "General",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Uncategorized
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single article as it flows through every pipeline stage and into storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default)]
    pub category: Category,
    /// Popularity score in 0..=100, assigned by the ranking stage.
    #[serde(default)]
    pub popularity: u8,
    #[serde(default)]
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

fn default_summary() -> String {
    NOT_SUMMARIZED.to_string()
}

impl Article {
    /// Create a fresh record. `title` and `url` must be non-empty; an absent
    /// or blank summary falls back to the [`NOT_SUMMARIZED`] sentinel.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: Option<String>,
        summary: Option<String>,
    ) -> Result<Self> {
        let title = title.into();
        let url = url.into();
        if title.trim().is_empty() {
            return Err(Error::MissingField("title"));
        }
        if url.trim().is_empty() {
            return Err(Error::MissingField("url"));
        }

        let id = Uuid::new_v4();
        Ok(Self {
            image: Some(image_url(&id)),
            id,
            title,
            url,
            source,
            summary: summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_summary),
            category: Category::default(),
            popularity: 0,
            timestamp: Utc::now(),
        })
    }
}

/// The article's illustration URL, derived from its id.
pub fn image_url(id: &Uuid) -> String {
    format!("https://picsum.photos/seed/{id}/400/300")
}

/// One item produced by the discovery stage, before it becomes an [`Article`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_article_gets_defaults() {
        let article = Article::new("Title", "https://example.com/a", None, None).unwrap();
        assert_eq!(article.summary, NOT_SUMMARIZED);
        assert_eq!(article.category, Category::Uncategorized);
        assert_eq!(article.popularity, 0);
        assert_eq!(article.image, Some(image_url(&article.id)));
    }

    #[test]
    fn new_article_rejects_empty_required_fields() {
        assert!(matches!(
            Article::new("", "https://example.com/a", None, None),
            Err(Error::MissingField("title"))
        ));
        assert!(matches!(
            Article::new("Title", "   ", None, None),
            Err(Error::MissingField("url"))
        ));
    }

    #[test]
    fn blank_summary_falls_back_to_sentinel() {
        let article =
            Article::new("Title", "https://example.com/a", None, Some("  ".to_string())).unwrap();
        assert_eq!(article.summary, NOT_SUMMARIZED);
    }

    #[test]
    fn ids_are_unique_per_record() {
        let a = Article::new("A", "https://example.com/a", None, None).unwrap();
        let b = Article::new("A", "https://example.com/a", None, None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deserializing_a_sparse_record_applies_defaults() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "title": "Title",
            "url": "https://example.com/a",
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary, NOT_SUMMARIZED);
        assert_eq!(article.category, Category::Uncategorized);
        assert_eq!(article.popularity, 0);
        assert_eq!(article.image, None);
    }
}
