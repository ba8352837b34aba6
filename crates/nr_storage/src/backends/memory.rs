use async_trait::async_trait;
use tokio::sync::RwLock;

use nr_core::{Article, ArticleStore, Result, SortKey};

/// In-memory store with the same full-replace contract as the file backend.
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn replace_all(&self, batch: &[Article]) -> Result<()> {
        *self.articles.write().await = batch.to_vec();
        Ok(())
    }

    async fn load_sorted(&self, key: SortKey) -> Result<Vec<Article>> {
        let mut articles = self.articles.read().await.clone();
        super::apply_sort(&mut articles, key);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_replaces_wholesale() {
        let store = MemoryStore::new();
        assert!(store.load_sorted(SortKey::Latest).await.unwrap().is_empty());

        let mut a = Article::new("a", "https://example.com/a", None, None).unwrap();
        a.popularity = 10;
        let mut b = Article::new("b", "https://example.com/b", None, None).unwrap();
        b.popularity = 80;

        store.replace_all(&[a, b]).await.unwrap();
        let loaded = store.load_sorted(SortKey::Popular).await.unwrap();
        assert_eq!(loaded[0].title, "b");

        store.replace_all(&[]).await.unwrap();
        assert!(store.load_sorted(SortKey::Popular).await.unwrap().is_empty());
    }
}
