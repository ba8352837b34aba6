pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use nr_core::{Article, SortKey};

/// Stable descending sort by the requested key; ties keep their stored order.
pub(crate) fn apply_sort(articles: &mut [Article], key: SortKey) {
    match key {
        SortKey::Latest => articles.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Popular => articles.sort_by(|a, b| b.popularity.cmp(&a.popularity)),
    }
}
