pub mod commander;
pub mod dispatcher;
mod json;
pub mod stages;

pub use commander::{Commander, RunResult, RunStatus};
pub use dispatcher::{Dispatcher, Stage};
pub use stages::{NewsClassifier, NewsDiscovery, NewsRanker};

pub mod prelude {
    pub use super::{Commander, Dispatcher, NewsClassifier, NewsDiscovery, NewsRanker};
    pub use nr_core::{Article, Candidate, Category, Error, Result};
}
