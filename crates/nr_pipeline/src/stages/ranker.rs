use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use nr_core::{Ranker, Result, TextGenerator, ToolSet};

use crate::json;

/// Batch ranking over the text generator.
///
/// One call scores the whole batch so the model can weigh titles against
/// each other. Results correlate back strictly by 1-based position; ids
/// outside the batch and scores outside 0..=100 are discarded outright.
pub struct NewsRanker {
    generator: Arc<dyn TextGenerator>,
}

impl NewsRanker {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn prompt(titles: &[String]) -> String {
        let numbered: Vec<String> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!("{}. {title}", i + 1))
            .collect();
        format!(
            r#"Based on the following list of news titles, evaluate the potential popularity of each on a scale from 0 to 100. Consider public interest, impact, and keyword relevance. Your response MUST be a JSON array of objects, where each object has 'id' (the original number) and 'score' (0-100).

Titles:
{}

Example JSON response: [{{"id": 1, "score": 85}}, {{"id": 2, "score": 60}}]"#,
            numbered.join("\n")
        )
    }

    fn parse_scores(reply: &str, batch_len: usize) -> Result<HashMap<usize, u8>> {
        let value = json::extract_array(reply)?;
        let entries = match value {
            Value::Array(entries) => entries,
            _ => return Ok(HashMap::new()),
        };

        let mut scores = HashMap::new();
        for entry in entries {
            // as_u64 is None for negative or fractional numbers, which is
            // exactly the "drop, don't clamp" policy.
            let id = entry.get("id").and_then(Value::as_u64);
            let score = entry.get("score").and_then(Value::as_u64);
            let (Some(id), Some(score)) = (id, score) else {
                debug!(%entry, "dropping score entry without integer id/score");
                continue;
            };
            if id < 1 || id > batch_len as u64 {
                debug!(id, batch_len, "dropping score for unknown position");
                continue;
            }
            if score > 100 {
                debug!(id, score, "dropping out-of-range score");
                continue;
            }
            scores.insert(id as usize, score as u8);
        }
        Ok(scores)
    }
}

#[async_trait]
impl Ranker for NewsRanker {
    async fn rank(&self, titles: &[String]) -> Result<HashMap<usize, u8>> {
        if titles.is_empty() {
            return Ok(HashMap::new());
        }
        info!(count = titles.len(), "📊 ranking titles");

        let reply = match self
            .generator
            .generate(&Self::prompt(titles), &ToolSet::new())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "ranking generation failed; scores default to 0");
                return Ok(HashMap::new());
            }
        };

        match Self::parse_scores(&reply, titles.len()) {
            Ok(scores) => Ok(scores),
            Err(e) => {
                warn!(error = %e, "ranking response could not be parsed; scores default to 0");
                Ok(HashMap::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_inference::ScriptedModel;

    fn ranker(responses: Vec<&str>) -> NewsRanker {
        NewsRanker::new(Arc::new(ScriptedModel::new(responses)))
    }

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn correlates_by_position_even_with_duplicate_titles() {
        let ranker = ranker(vec![r#"[{"id": 1, "score": 10}, {"id": 3, "score": 90}]"#]);
        let scores = ranker.rank(&titles(&["A", "B", "A"])).await.unwrap();
        assert_eq!(scores.get(&1), Some(&10));
        assert_eq!(scores.get(&2), None);
        assert_eq!(scores.get(&3), Some(&90));
    }

    #[tokio::test]
    async fn drops_ids_outside_the_batch() {
        let ranker = ranker(vec![r#"[{"id": 0, "score": 5}, {"id": 4, "score": 5}, {"id": 2, "score": 70}]"#]);
        let scores = ranker.rank(&titles(&["A", "B", "C"])).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get(&2), Some(&70));
    }

    #[tokio::test]
    async fn drops_out_of_range_and_non_integer_scores() {
        let ranker = ranker(vec![
            r#"[{"id": 1, "score": 150}, {"id": 2, "score": -5}, {"id": 3, "score": 61.5}, {"id": 4, "score": 100}]"#,
        ]);
        let scores = ranker.rank(&titles(&["A", "B", "C", "D"])).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get(&4), Some(&100));
    }

    #[tokio::test]
    async fn unparsable_replies_default_everything_to_zero() {
        let ranker = ranker(vec!["these all look great to me"]);
        let scores = ranker.rank(&titles(&["A", "B"])).await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let ranker = ranker(vec!["```json\n[{\"id\": 1, \"score\": 42}]\n```"]);
        let scores = ranker.rank(&titles(&["A"])).await.unwrap();
        assert_eq!(scores.get(&1), Some(&42));
    }

    #[tokio::test]
    async fn empty_batch_skips_the_generator() {
        // No scripted responses: a generate call would error the script.
        let ranker = ranker(vec![]);
        let scores = ranker.rank(&[]).await.unwrap();
        assert!(scores.is_empty());
    }
}
