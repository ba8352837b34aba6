use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// The text-generation collaborator: prompt in, final text out.
///
/// Implementations may loop internally, executing calls against the given
/// [`ToolSet`] and feeding results back, before returning the final text.
/// Callers must defensively parse whatever comes back; even an `Ok` reply
/// carries no shape guarantee.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, tools: &ToolSet) -> Result<String>;
}

/// A capability the model may invoke while generating.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments object.
    fn parameters(&self) -> Value;

    async fn call(&self, args: Value) -> Result<Value>;
}

/// An ordered collection of tools, addressable by name.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|tool| tool.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its arguments back."
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn call(&self, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn tool_set_finds_tools_by_name() {
        let tools = ToolSet::new().with(Arc::new(Echo));
        assert_eq!(tools.len(), 1);
        assert!(tools.get("echo").is_some());
        assert!(tools.get("missing").is_none());

        let reply = tools.get("echo").unwrap().call(json!({"q": 1})).await.unwrap();
        assert_eq!(reply, json!({"q": 1}));
    }
}
