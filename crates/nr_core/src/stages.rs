use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::{Candidate, Category};
use crate::Result;

/// Finds candidate articles for a topic.
///
/// A failed or unparsable underlying lookup is not an error: the stage
/// returns an empty sequence and the caller decides what that means.
#[async_trait]
pub trait Discovery: Send + Sync {
    async fn discover(&self, topic: &str, limit: usize) -> Result<Vec<Candidate>>;
}

/// Assigns one label from the closed [`Category`] set to an article.
///
/// Empty `title` or `summary` is a caller contract violation and yields
/// `Error::MissingField`; everything else degrades to `Category::General`.
#[async_trait]
pub trait Categorizer: Send + Sync {
    async fn categorize(&self, title: &str, summary: &str) -> Result<Category>;
}

/// Scores a whole batch of titles in one call.
///
/// The returned map is keyed by 1-based position in the input batch; absent
/// positions mean "no score" and are left to the caller's default.
#[async_trait]
pub trait Ranker: Send + Sync {
    async fn rank(&self, titles: &[String]) -> Result<HashMap<usize, u8>>;
}
