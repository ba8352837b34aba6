use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nr_core::{Error, Result, TextGenerator, ToolSet};

/// Offline model that replays a fixed list of responses in order.
///
/// Used by stage and pipeline tests; exhausting the script is an error so a
/// test that makes one call too many fails loudly.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

impl fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedModel").finish()
    }
}

#[async_trait]
impl TextGenerator for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _prompt: &str, _tools: &ToolSet) -> Result<String> {
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| Error::Inference("scripted model has no responses left".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_responses_in_order_then_errors() {
        let model = ScriptedModel::new(["one", "two"]);
        let tools = ToolSet::new();
        assert_eq!(model.generate("p", &tools).await.unwrap(), "one");
        assert_eq!(model.generate("p", &tools).await.unwrap(), "two");
        assert!(model.generate("p", &tools).await.is_err());
    }
}
