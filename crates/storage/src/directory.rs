use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Article;
use serde::Deserialize;
use tracing::{debug, info};

use crate::repository::{ArticleRepository, StorageError};

/// Reads articles from `*.json` files in a directory.
///
/// A file holds either one article object or an array of them. Files are read
/// in file-name order; other extensions are ignored. Any JSON object is an
/// article, unknown fields included. A file that is not valid JSON, or not an
/// object or array of objects, fails the whole listing.
#[derive(Debug, Clone)]
pub struct DirectoryArticleRepository {
    dir: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArticleFile {
    Many(Vec<Article>),
    One(Article),
}

impl DirectoryArticleRepository {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn json_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|source| self.io_error(&self.dir, source))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| self.io_error(&self.dir, source))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-json file");
            }
        }
        files.sort();
        Ok(files)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        if source.kind() == ErrorKind::NotFound && path == self.dir {
            return StorageError::NotFound(path.display().to_string());
        }
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl ArticleRepository for DirectoryArticleRepository {
    async fn list_articles(&self) -> Result<Vec<Article>, StorageError> {
        let mut articles = Vec::new();
        for path in self.json_files().await? {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| self.io_error(&path, source))?;
            let parsed: ArticleFile =
                serde_json::from_str(&raw).map_err(|e| StorageError::Serialization {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            match parsed {
                ArticleFile::Many(many) => articles.extend(many),
                ArticleFile::One(one) => articles.push(one),
            }
        }
        info!(dir = %self.dir.display(), count = articles.len(), "loaded articles");
        Ok(articles)
    }
}
