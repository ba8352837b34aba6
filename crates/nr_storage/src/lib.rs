pub mod backends;

pub use backends::{JsonFileStore, MemoryStore};

pub mod prelude {
    pub use super::backends::{JsonFileStore, MemoryStore};
    pub use nr_core::{ArticleStore, SortKey};
}
