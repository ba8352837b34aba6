use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// Sort order for reads of the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most recent first (`timestamp` descending).
    Latest,
    /// Highest score first (`popularity` descending).
    Popular,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Popular => "popular",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortKey::Latest),
            "popular" => Ok(SortKey::Popular),
            other => Err(format!(
                "invalid sort key '{other}' (expected 'latest' or 'popular')"
            )),
        }
    }
}

/// Whole-collection persistence: every write replaces everything.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Atomically replace the persisted collection with `batch`.
    async fn replace_all(&self, batch: &[Article]) -> Result<()>;

    /// Read the whole collection ordered by `key`. An absent or unreadable
    /// store reads as an empty collection.
    async fn load_sorted(&self, key: SortKey) -> Result<Vec<Article>>;
}
