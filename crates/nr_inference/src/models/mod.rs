use std::sync::Arc;

use nr_core::{Error, Result, TextGenerator};

use crate::ModelConfig;

pub mod openai;
pub mod scripted;

pub use openai::OpenAiModel;
pub use scripted::ScriptedModel;

/// Build a model backend by name.
pub fn create_model(backend: &str, config: ModelConfig) -> Result<Arc<dyn TextGenerator>> {
    match backend {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        "scripted" => Ok(Arc::new(ScriptedModel::new(Vec::<String>::new()))),
        other => Err(Error::Inference(format!("unknown model backend: {other}"))),
    }
}
