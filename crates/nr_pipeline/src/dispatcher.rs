use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use nr_core::{
    Article, ArticleStore, Candidate, Categorizer, Category, Discovery, Ranker, Result, SortKey,
};

/// The receivers a pipeline request can be addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Categorization,
    Ranking,
    Persistence,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Categorization => "categorization",
            Stage::Ranking => "ranking",
            Stage::Persistence => "persistence",
        };
        f.write_str(name)
    }
}

/// Point-to-point router between the commander and the stages.
///
/// One typed method per stage; the handler table is fixed at construction,
/// so a request can never name a receiver that does not exist. Each call
/// forwards the payload and returns the handler's result unchanged. No
/// retry, no buffering, no ordering across calls.
pub struct Dispatcher {
    discovery: Arc<dyn Discovery>,
    categorizer: Arc<dyn Categorizer>,
    ranker: Arc<dyn Ranker>,
    store: Arc<dyn ArticleStore>,
}

impl Dispatcher {
    pub fn new(
        discovery: Arc<dyn Discovery>,
        categorizer: Arc<dyn Categorizer>,
        ranker: Arc<dyn Ranker>,
        store: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            discovery,
            categorizer,
            ranker,
            store,
        }
    }

    pub async fn discover(&self, topic: &str, limit: usize) -> Result<Vec<Candidate>> {
        self.trace(Stage::Discovery);
        self.discovery.discover(topic, limit).await
    }

    pub async fn categorize(&self, title: &str, summary: &str) -> Result<Category> {
        self.trace(Stage::Categorization);
        self.categorizer.categorize(title, summary).await
    }

    pub async fn rank(&self, titles: &[String]) -> Result<HashMap<usize, u8>> {
        self.trace(Stage::Ranking);
        self.ranker.rank(titles).await
    }

    pub async fn store(&self, batch: &[Article]) -> Result<()> {
        self.trace(Stage::Persistence);
        self.store.replace_all(batch).await
    }

    pub async fn load(&self, key: SortKey) -> Result<Vec<Article>> {
        self.trace(Stage::Persistence);
        self.store.load_sorted(key).await
    }

    fn trace(&self, receiver: Stage) {
        debug!(%receiver, "commander → stage");
    }
}
