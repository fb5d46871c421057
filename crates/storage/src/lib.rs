#![forbid(unsafe_code)]

pub mod directory;
pub mod repository;

pub use directory::DirectoryArticleRepository;
pub use repository::{ArticleRepository, InMemoryArticleRepository, Storage, StorageError};
