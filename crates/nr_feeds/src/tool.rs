use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use nr_core::{Error, NewsLookup, Result, Tool};

/// Exposes a [`NewsLookup`] to the language model as a callable tool.
pub struct NewsSearchTool {
    lookup: Arc<dyn NewsLookup>,
}

impl NewsSearchTool {
    pub fn new(lookup: Arc<dyn NewsLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn name(&self) -> &str {
        "news_search"
    }

    fn description(&self) -> &str {
        "Search recent news for a query. Returns title, link, summary, published date, and source for each result."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find news on the web."
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or(Error::MissingField("query"))?;

        debug!(query, "news search tool invoked");
        let results = self.lookup.lookup(query).await?;
        if results.is_empty() {
            return Ok(json!({"results": "No articles found for the query."}));
        }
        Ok(json!({ "results": results }))
    }
}
