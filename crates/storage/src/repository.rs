use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::Article;
use thiserror::Error;

use crate::directory::DirectoryArticleRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error in {path}: {message}")]
    Serialization { path: PathBuf, message: String },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Source of news articles to build quizzes from.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List every available article, in a stable order.
    ///
    /// An empty list is not an error here; the supplier decides what that means.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn list_articles(&self) -> Result<Vec<Article>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryArticleRepository {
    articles: Arc<Mutex<Vec<Article>>>,
}

impl InMemoryArticleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(Mutex::new(articles)),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn push(&self, article: Article) -> Result<(), StorageError> {
        let mut guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(article);
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list_articles(&self) -> Result<Vec<Article>, StorageError> {
        let guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Article backend behind a trait object for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub articles: Arc<dyn ArticleRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(InMemoryArticleRepository::with_articles(articles)),
        }
    }

    #[must_use]
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            articles: Arc::new(DirectoryArticleRepository::new(dir)),
        }
    }
}
