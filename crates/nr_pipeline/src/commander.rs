use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use nr_core::{Article, Candidate, Result};

use crate::dispatcher::Dispatcher;

/// Default upper bound on discovered items per run.
pub const DEFAULT_MAX_ARTICLES: usize = 30;

/// Concurrent enrichment calls in flight at once.
const ENRICH_CONCURRENCY: usize = 10;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The batch was enriched, ranked, and persisted.
    Completed,
    /// Discovery found nothing; the run stopped and the previously
    /// persisted collection was left untouched.
    Empty,
}

/// Outcome of one end-to-end pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub stored: usize,
}

impl RunResult {
    fn empty(reason: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Empty,
            reason: Some(reason.into()),
            stored: 0,
        }
    }

    fn completed(stored: usize) -> Self {
        Self {
            status: RunStatus::Completed,
            reason: None,
            stored,
        }
    }
}

/// Sequences one pipeline run: discover, enrich per item, rank the batch,
/// persist. One topic, one run; runs are not resumable and keep no mid-run
/// checkpoint. A crash loses in-flight results but never the previously
/// persisted collection.
pub struct Commander {
    dispatcher: Dispatcher,
    max_articles: usize,
    concurrency: usize,
}

impl Commander {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            max_articles: DEFAULT_MAX_ARTICLES,
            concurrency: ENRICH_CONCURRENCY,
        }
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn run(&self, topic: &str) -> Result<RunResult> {
        info!(topic, "🚀 pipeline run started");

        let candidates = self.dispatcher.discover(topic, self.max_articles).await?;
        if candidates.is_empty() {
            info!(topic, "pipeline stopped: no articles found");
            return Ok(RunResult::empty("no articles found"));
        }

        let mut articles = self.enrich(candidates).await;
        if articles.is_empty() {
            info!(topic, "pipeline stopped: no valid candidates survived");
            return Ok(RunResult::empty("no valid candidates"));
        }

        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let scores = self.dispatcher.rank(&titles).await?;
        for (index, article) in articles.iter_mut().enumerate() {
            // Score ids are 1-based positions in the batch.
            article.popularity = scores.get(&(index + 1)).copied().unwrap_or(0);
        }

        self.dispatcher.store(&articles).await?;
        info!(topic, stored = articles.len(), "✅ pipeline run finished");
        Ok(RunResult::completed(articles.len()))
    }

    /// Turn candidates into categorized articles.
    ///
    /// Items are independent, so categorization runs concurrently under a
    /// semaphore; the batch is re-assembled in discovery order afterwards
    /// because ranking correlates by position.
    async fn enrich(&self, candidates: Vec<Candidate>) -> Vec<Article> {
        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let futures: Vec<_> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let semaphore = semaphore.clone();
                async move {
                    let mut article = match Article::new(
                        candidate.title,
                        candidate.url,
                        candidate.source,
                        candidate.summary,
                    ) {
                        Ok(article) => article,
                        Err(e) => {
                            warn!(index, error = %e, "dropping unbuildable candidate");
                            return (index, None);
                        }
                    };

                    if let Ok(_permit) = semaphore.acquire().await {
                        debug!(item = index + 1, total, title = %article.title, "enriching");
                        match self
                            .dispatcher
                            .categorize(&article.title, &article.summary)
                            .await
                        {
                            Ok(category) => article.category = category,
                            Err(e) => {
                                warn!(title = %article.title, error = %e, "categorization failed; keeping default");
                            }
                        }
                    }
                    (index, Some(article))
                }
            })
            .collect();

        let mut enriched = join_all(futures).await;
        enriched.sort_by_key(|(index, _)| *index);
        enriched.into_iter().filter_map(|(_, article)| article).collect()
    }
}
