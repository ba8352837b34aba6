use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One result from the external news lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: String,
    pub source: String,
}

/// The external search/feed collaborator.
///
/// Implementations resolve redirected links to their final destination when
/// feasible; a per-item resolution failure keeps the original link.
#[async_trait]
pub trait NewsLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<LookupItem>>;
}
