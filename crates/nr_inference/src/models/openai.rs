use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use nr_core::{Error, Result, TextGenerator, ToolSet};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Rounds of tool execution before the loop is cut off.
const MAX_TOOL_ROUNDS: usize = 4;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDecl>,
}

#[derive(Serialize, Clone)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn assistant_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    fn tool_result(call_id: String, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id),
        }
    }
}

#[derive(Serialize, Clone)]
struct ToolDecl {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionDecl,
}

#[derive(Serialize, Clone)]
struct FunctionDecl {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Serialize, Deserialize, Clone)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    function: FunctionCall,
}

#[derive(Serialize, Deserialize, Clone)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

/// Chat-completions backend for any OpenAI-compatible endpoint.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiModel {
    pub fn new(config: crate::ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| Error::Inference("OpenAI API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config.base_url.unwrap_or_else(|| OPENAI_API_URL.to_string()),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn declarations(tools: &ToolSet) -> Vec<ToolDecl> {
        tools
            .iter()
            .map(|tool| ToolDecl {
                kind: "function".to_string(),
                function: FunctionDecl {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters(),
                },
            })
            .collect()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, messages = request.messages.len(), "chat request");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("chat API error ({status}): {body}")));
        }

        Ok(response.json().await?)
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, tools: &ToolSet) -> Result<String> {
        let declarations = Self::declarations(tools);
        let mut messages = vec![ChatMessage::user(prompt.to_string())];

        for _round in 0..=MAX_TOOL_ROUNDS {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: declarations.clone(),
            };
            let response = self.chat(&request).await?;
            let choice = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| Error::Inference("response carried no choices".to_string()))?;

            match choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => {
                    debug!(calls = calls.len(), "executing tool calls");
                    messages.push(ChatMessage::assistant_calls(calls.clone()));
                    for call in calls {
                        let tool = tools.get(&call.function.name).ok_or_else(|| {
                            Error::Inference(format!(
                                "model requested unknown tool: {}",
                                call.function.name
                            ))
                        })?;
                        let args: Value =
                            serde_json::from_str(&call.function.arguments).unwrap_or(json!({}));
                        let result = tool.call(args).await?;
                        messages.push(ChatMessage::tool_result(call.id, result.to_string()));
                    }
                }
                _ => {
                    return choice
                        .message
                        .content
                        .ok_or_else(|| Error::Inference("response carried no content".to_string()));
                }
            }
        }

        Err(Error::Inference(format!(
            "tool loop did not settle within {MAX_TOOL_ROUNDS} rounds"
        )))
    }
}
