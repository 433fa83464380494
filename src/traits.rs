//! Extension trait for article sources.
//!
//! The built-in [`FilesystemSource`](crate::connector_fs::FilesystemSource)
//! reads Markdown files from disk. Implement [`ArticleSource`] to feed
//! articles from anywhere else (a CMS export, a database, a test fixture)
//! through the same pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ArticleSource               │
//! │  ┌────────────┐  ┌────────┐  ┌────────┐  │
//! │  │ Filesystem │  │ Memory │  │ Custom │  │
//! │  └────────────┘  └────────┘  └────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!     list() ─▶ fetch() per entry (fan-out) ─▶ build_site()
//! ```
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use anyhow::Result;
//! use folio::traits::ArticleSource;
//! use folio_core::error::ArticleError;
//! use folio_core::models::RawArticle;
//!
//! pub struct Fixed(Vec<RawArticle>);
//!
//! #[async_trait]
//! impl ArticleSource for Fixed {
//!     fn name(&self) -> &str { "fixed" }
//!
//!     async fn list(&self) -> Result<Vec<String>> {
//!         Ok(self.0.iter().map(|a| a.source_id.clone()).collect())
//!     }
//!
//!     async fn fetch(&self, source_id: &str) -> Result<RawArticle, ArticleError> {
//!         self.0
//!             .iter()
//!             .find(|a| a.source_id == source_id)
//!             .cloned()
//!             .ok_or_else(|| ArticleError::Read(format!("unknown entry {}", source_id)))
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use folio_core::error::ArticleError;
use folio_core::models::RawArticle;

/// A collection of raw articles.
///
/// # Lifecycle
///
/// 1. [`list`](ArticleSource::list) enumerates entries in a deterministic
///    order; that order is the input order of the pipeline.
/// 2. [`fetch`](ArticleSource::fetch) is called once per entry, possibly
///    concurrently. A failed fetch excludes that entry only.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Entry identifiers in input order.
    ///
    /// An error here means the whole source is unusable (e.g. the content
    /// root does not exist) and aborts the build.
    async fn list(&self) -> Result<Vec<String>>;

    /// Produce the raw article for one entry.
    async fn fetch(&self, source_id: &str) -> Result<RawArticle, ArticleError>;
}

/// An in-memory source, mainly for embedding Folio and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    articles: Vec<RawArticle>,
}

impl MemorySource {
    pub fn new(articles: Vec<RawArticle>) -> Self {
        Self { articles }
    }

    /// Replace the article collection.
    pub fn set(&mut self, articles: Vec<RawArticle>) {
        self.articles = articles;
    }
}

#[async_trait]
impl ArticleSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.articles.iter().map(|a| a.source_id.clone()).collect())
    }

    async fn fetch(&self, source_id: &str) -> Result<RawArticle, ArticleError> {
        self.articles
            .iter()
            .find(|a| a.source_id == source_id)
            .cloned()
            .ok_or_else(|| ArticleError::Read(format!("no entry named {}", source_id)))
    }
}
