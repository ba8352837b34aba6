use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use nr_core::{Article, ArticleStore, Result, SortKey};

/// Whole-collection persistence in one JSON file.
///
/// Writes land in a sibling temp file first and are renamed over the target,
/// so a reader never observes a partially written collection. The internal
/// lock makes writes exclusive and reads shared at file granularity.
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os: OsString = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }

    /// Missing, empty, or corrupt files all read as an empty collection.
    async fn read_collection(&self) -> Vec<Article> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "store not readable; treating as empty");
                return Vec::new();
            }
        };
        if bytes.is_empty() {
            return Vec::new();
        }
        match serde_json::from_slice(&bytes) {
            Ok(articles) => articles,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store contents unparsable; treating as empty");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn replace_all(&self, batch: &[Article]) -> Result<()> {
        let json = serde_json::to_vec_pretty(batch)?;

        let _guard = self.lock.write().await;
        let tmp = self.tmp_path();
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = batch.len(), "collection replaced");
        Ok(())
    }

    async fn load_sorted(&self, key: SortKey) -> Result<Vec<Article>> {
        let mut articles = {
            let _guard = self.lock.read().await;
            self.read_collection().await
        };
        super::apply_sort(&mut articles, key);
        Ok(articles)
    }
}
