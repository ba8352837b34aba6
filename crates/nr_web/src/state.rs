use std::sync::Arc;

use nr_core::ArticleStore;
use nr_pipeline::Commander;

pub struct AppState {
    pub commander: Arc<Commander>,
    pub store: Arc<dyn ArticleStore>,
    /// Topic used when a run request names none.
    pub default_topic: String,
}
