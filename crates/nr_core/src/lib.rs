pub mod error;
pub mod llm;
pub mod lookup;
pub mod stages;
pub mod storage;
pub mod types;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use llm::{TextGenerator, Tool, ToolSet};
pub use lookup::{LookupItem, NewsLookup};
pub use stages::{Categorizer, Discovery, Ranker};
pub use storage::{ArticleStore, SortKey};
pub use types::{Article, Candidate, Category};
