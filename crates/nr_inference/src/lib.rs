pub mod models;

pub use models::{create_model, OpenAiModel, ScriptedModel};

/// Connection settings for a model backend.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::ModelConfig;
    pub use nr_core::{Result, TextGenerator, Tool, ToolSet};
}
