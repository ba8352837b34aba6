use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use nr_core::{Candidate, Discovery, Error, Result, TextGenerator, Tool, ToolSet};

use crate::json;

/// Discovery backed by the text generator with the news-search tool attached.
///
/// Every returned candidate must be attributable to a lookup result, so the
/// prompt forbids fabrication and the stage never invents items of its own.
/// Anything that goes wrong downstream degrades to an empty sequence.
pub struct NewsDiscovery {
    generator: Arc<dyn TextGenerator>,
    tools: ToolSet,
}

impl NewsDiscovery {
    pub fn new(generator: Arc<dyn TextGenerator>, search: Arc<dyn Tool>) -> Self {
        Self {
            generator,
            tools: ToolSet::new().with(search),
        }
    }

    fn prompt(topic: &str, limit: usize) -> String {
        format!(
            r#"You are a news analyst. Your task is to find up to {limit} recent, significant news articles about '{topic}'.

You MUST use the provided search tool to find the news. Do not make up news.

For each article, provide:
1. The exact title of the article.
2. The full URL.
3. The source publication name.
4. A 3-sentence summary based on the real article content.

The URL, title, and source must come from the search tool results.

Format the information as a single JSON object under the key "articles".
If you cannot find any relevant articles after searching, return {{"articles": []}}.

Example response:
{{
  "articles": [
    {{
      "title": "Verified News Title from Search",
      "url": "https://example.com/the-correct-url",
      "source": "Example News Outlet",
      "summary": "A three-sentence summary based on the content at the provided URL."
    }}
  ]
}}"#
        )
    }

    fn parse_candidates(reply: &str, limit: usize) -> Result<Vec<Candidate>> {
        let value = json::extract_object(reply)?;
        let articles = value
            .get("articles")
            .ok_or_else(|| Error::MalformedResponse("response has no 'articles' key".to_string()))?;
        let candidates: Vec<Candidate> = serde_json::from_value(articles.clone())
            .map_err(|e| Error::MalformedResponse(format!("unexpected article shape: {e}")))?;

        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                let valid = !candidate.title.trim().is_empty() && !candidate.url.trim().is_empty();
                if !valid {
                    warn!(title = %candidate.title, "dropping candidate without title or url");
                }
                valid
            })
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl Discovery for NewsDiscovery {
    async fn discover(&self, topic: &str, limit: usize) -> Result<Vec<Candidate>> {
        info!(topic, limit, "🔎 discovering articles");

        let reply = match self
            .generator
            .generate(&Self::prompt(topic, limit), &self.tools)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(topic, error = %e, "discovery generation failed");
                return Ok(Vec::new());
            }
        };

        match Self::parse_candidates(&reply, limit) {
            Ok(candidates) => {
                info!(topic, found = candidates.len(), "🗞️ discovery finished");
                Ok(candidates)
            }
            Err(e) => {
                warn!(topic, error = %e, "discovery response could not be parsed");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_inference::ScriptedModel;
    use serde_json::{json, Value};

    struct NullSearch;

    #[async_trait]
    impl Tool for NullSearch {
        fn name(&self) -> &str {
            "news_search"
        }

        fn description(&self) -> &str {
            "Test search."
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn call(&self, _args: Value) -> Result<Value> {
            Ok(json!({"results": []}))
        }
    }

    fn discovery(responses: Vec<&str>) -> NewsDiscovery {
        NewsDiscovery::new(Arc::new(ScriptedModel::new(responses)), Arc::new(NullSearch))
    }

    #[tokio::test]
    async fn parses_well_formed_replies() {
        let reply = r#"{"articles": [
            {"title": "A", "url": "https://example.com/a", "source": "Ex", "summary": "S."},
            {"title": "B", "url": "https://example.com/b"}
        ]}"#;
        let candidates = discovery(vec![reply]).discover("rust", 30).await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "A");
        assert_eq!(candidates[1].summary, None);
    }

    #[tokio::test]
    async fn honors_the_item_bound() {
        let reply = r#"{"articles": [
            {"title": "A", "url": "https://example.com/a"},
            {"title": "B", "url": "https://example.com/b"},
            {"title": "C", "url": "https://example.com/c"}
        ]}"#;
        let candidates = discovery(vec![reply]).discover("rust", 2).await.unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[tokio::test]
    async fn drops_candidates_missing_required_fields() {
        let reply = r#"{"articles": [
            {"title": "", "url": "https://example.com/a"},
            {"title": "B", "url": "https://example.com/b"}
        ]}"#;
        let candidates = discovery(vec![reply]).discover("rust", 30).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "B");
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let reply = "```json\n{\"articles\": [{\"title\": \"A\", \"url\": \"https://example.com/a\"}]}\n```";
        let candidates = discovery(vec![reply]).discover("rust", 30).await.unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn malformed_replies_yield_an_empty_sequence() {
        let candidates = discovery(vec!["I could not find anything, sorry."])
            .discover("rust", 30)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn generator_failure_yields_an_empty_sequence() {
        // Empty script: the first generate call fails.
        let candidates = discovery(vec![]).discover("rust", 30).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn explicit_empty_articles_is_empty_not_an_error() {
        let candidates = discovery(vec![r#"{"articles": []}"#])
            .discover("rust", 30)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
