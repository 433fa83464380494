//! Ingestion pipeline orchestration.
//!
//! Coordinates the full build: source listing → concurrent fetch and
//! front-matter parsing → validation → concurrent rendering → hierarchy.
//! Per-article failures are logged and collected; they never abort the
//! build.
//!
//! Fan-out results carry their input position and are re-sorted on
//! gather (a panicked task becomes a failure for its own entry only), so categorization always sees the complete batch in input
//! order. The hierarchy is only built once every article has been
//! gathered.

use anyhow::Result;
use folio_core::cards::project;
use folio_core::error::{ArticleError, Failure};
use folio_core::hierarchy::build_index;
use folio_core::loader::load_articles;
use folio_core::models::{
    ArticleRecord, Card, CatalogEntry, HierarchicalIndex, RawArticle, RenderedArticle,
};
use folio_core::render::render;
use folio_core::summary::{summarize, ContextSummary};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::traits::ArticleSource;

/// The result of one build: the index plus everything that was excluded.
#[derive(Debug, Clone)]
pub struct Site {
    pub index: HierarchicalIndex,
    pub failures: Vec<Failure>,
    /// Hash of the source collection this site was built from.
    pub fingerprint: String,
}

impl Site {
    pub fn cards(&self, catalog: &[CatalogEntry]) -> Vec<Card> {
        project(&self.index, catalog)
    }

    pub fn summary(&self, recent_limit: usize) -> ContextSummary {
        summarize(&self.index, recent_limit)
    }

    pub fn article(&self, id: &str) -> Result<&RenderedArticle, ArticleError> {
        Ok(self.index.find(id)?)
    }
}

/// Fetched raw articles in input order, and the entries that failed.
#[derive(Debug, Default)]
pub struct Fetched {
    pub articles: Vec<RawArticle>,
    pub failures: Vec<Failure>,
}

/// Fetch every entry of a source concurrently.
pub async fn fetch_all(source: Arc<dyn ArticleSource>) -> Result<Fetched> {
    let entries = source.list().await?;
    info!(source = source.name(), entries = entries.len(), "scanning source");

    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();
    for (slot, source_id) in entries.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let task_source_id = source_id.clone();
        let handle = tasks.spawn(async move { source.fetch(&task_source_id).await });
        pending.insert(handle.id(), (slot, source_id));
    }

    let mut results = Vec::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, result)) => (id, result),
            Err(err) => (err.id(), Err(ArticleError::Task(err.to_string()))),
        };
        if let Some((slot, source_id)) = pending.remove(&id) {
            results.push((slot, source_id, result));
        }
    }
    results.sort_by_key(|(slot, _, _)| *slot);

    let mut fetched = Fetched::default();
    for (_, source_id, result) in results {
        match result {
            Ok(raw) => fetched.articles.push(raw),
            Err(err) => {
                warn!(source = %source_id, error = %err, "excluding unreadable article");
                fetched.failures.push(Failure::new(source_id, err));
            }
        }
    }

    Ok(fetched)
}

/// Validate, render and index a fetched batch.
pub async fn build_site(fetched: Fetched) -> Result<Site> {
    let fingerprint = fingerprint(&fetched);
    let mut failures = fetched.failures;

    let loaded = load_articles(fetched.articles);
    failures.extend(loaded.failures);

    let rendered = render_concurrently(loaded.articles, &mut failures).await;
    let index = build_index(rendered);

    info!(
        articles = index.total_articles(),
        categories = index.categories.len(),
        failures = failures.len(),
        "built index"
    );

    Ok(Site {
        index,
        failures,
        fingerprint,
    })
}

/// Fetch and build in one step.
pub async fn run_pipeline(source: Arc<dyn ArticleSource>) -> Result<Site> {
    let fetched = fetch_all(source).await?;
    build_site(fetched).await
}

async fn render_concurrently(
    articles: Vec<ArticleRecord>,
    failures: &mut Vec<Failure>,
) -> Vec<RenderedArticle> {
    let count = articles.len();
    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();
    for (slot, article) in articles.into_iter().enumerate() {
        let source_id = article.source_id.clone();
        let handle = tasks.spawn_blocking(move || render(article).map_err(ArticleError::from));
        pending.insert(handle.id(), (slot, source_id));
    }

    let mut results = Vec::with_capacity(count);
    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, result)) => (id, result),
            Err(err) => (err.id(), Err(ArticleError::Task(err.to_string()))),
        };
        if let Some((slot, source_id)) = pending.remove(&id) {
            results.push((slot, source_id, result));
        }
    }
    results.sort_by_key(|(slot, _, _)| *slot);

    let mut rendered = Vec::with_capacity(count);
    for (_, source_id, result) in results {
        match result {
            Ok(article) => rendered.push(article),
            Err(err) => {
                warn!(source = %source_id, error = %err, "excluding unrenderable article");
                failures.push(Failure::new(source_id, err));
            }
        }
    }

    rendered
}

/// SHA-256 over every fetched article's identity, metadata and body, plus
/// the entries that could not be fetched.
pub fn fingerprint(fetched: &Fetched) -> String {
    let mut hasher = Sha256::new();
    for article in &fetched.articles {
        for field in [
            Some(&article.source_id),
            article.id.as_ref(),
            article.title.as_ref(),
            article.date.as_ref(),
            article.category.as_ref(),
            article.subcategory.as_ref(),
            Some(&article.body),
        ] {
            match field {
                Some(value) => {
                    hasher.update((value.len() as u64).to_le_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0xff]),
            }
        }
    }
    for failure in &fetched.failures {
        hasher.update([0xfe]);
        hasher.update(failure.to_string().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Caches the last built site and rebuilds it whole when the source
/// collection changes.
#[derive(Default)]
pub struct IndexCache {
    site: Option<Arc<Site>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current site, rebuilt only if the source fingerprint changed.
    ///
    /// Returns the site and whether it was rebuilt.
    pub async fn refresh(&mut self, source: Arc<dyn ArticleSource>) -> Result<(Arc<Site>, bool)> {
        let fetched = fetch_all(source).await?;
        let current = fingerprint(&fetched);

        if let Some(site) = &self.site {
            if site.fingerprint == current {
                return Ok((Arc::clone(site), false));
            }
        }

        let site = Arc::new(build_site(fetched).await?);
        self.site = Some(Arc::clone(&site));
        Ok((site, true))
    }

    pub fn invalidate(&mut self) {
        self.site = None;
    }

    pub fn current(&self) -> Option<Arc<Site>> {
        self.site.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MemorySource;
    use folio_core::error::RenderError;

    fn raw(source_id: &str, id: &str, date: &str, category: &str, body: &str) -> RawArticle {
        RawArticle {
            source_id: source_id.to_string(),
            id: Some(id.to_string()),
            title: Some(format!("Title {}", id)),
            date: Some(date.to_string()),
            category: Some(category.to_string()),
            subcategory: None,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_pipeline_partial_failures() {
        let source = Arc::new(MemorySource::new(vec![
            raw("1.md", "1", "01-02-2024", "Blog", "first"),
            raw("2.md", "2", "15-03-2024", "Blog", "second"),
            raw("bad-date.md", "3", "2024/01/01", "Blog", "x"),
            raw("dup.md", "1", "01-01-2024", "Blog", "again"),
            raw("fence.md", "5", "01-01-2024", "Blog", "```\nopen"),
        ]));

        let site = run_pipeline(source).await.unwrap();

        let blog = site.index.category("Blog").unwrap();
        let ids: Vec<_> = blog.uncategorized_articles.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let failed: Vec<_> = site.failures.iter().map(|f| f.source_id.as_str()).collect();
        assert_eq!(failed, vec!["bad-date.md", "dup.md", "fence.md"]);
        assert!(matches!(
            site.failures[2].error,
            ArticleError::Render(RenderError::UnclosedFence { .. })
        ));
    }

    /// Panics while fetching one named entry.
    struct FlakySource {
        inner: MemorySource,
        broken: &'static str,
    }

    #[async_trait::async_trait]
    impl ArticleSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn list(&self) -> Result<Vec<String>> {
            self.inner.list().await
        }

        async fn fetch(&self, source_id: &str) -> Result<RawArticle, ArticleError> {
            if source_id == self.broken {
                panic!("reader crashed on {}", source_id);
            }
            self.inner.fetch(source_id).await
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_excludes_only_that_article() {
        let source = Arc::new(FlakySource {
            inner: MemorySource::new(vec![
                raw("a.md", "a", "01-01-2024", "Blog", "one"),
                raw("b.md", "b", "02-01-2024", "Blog", "two"),
                raw("c.md", "c", "03-01-2024", "Blog", "three"),
            ]),
            broken: "b.md",
        });

        let site = run_pipeline(source).await.unwrap();

        let ids: Vec<_> = site.index.articles().map(|a| a.id().to_string()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(site.failures.len(), 1);
        assert_eq!(site.failures[0].source_id, "b.md");
        assert!(matches!(site.failures[0].error, ArticleError::Task(_)));
    }

    #[tokio::test]
    async fn test_duplicate_of_unrenderable_article_is_not_promoted() {
        let source = Arc::new(MemorySource::new(vec![
            raw("a.md", "x", "01-01-2024", "Blog", "```\nopen"),
            raw("b.md", "x", "01-01-2024", "Blog", "fine"),
        ]));

        let site = run_pipeline(source).await.unwrap();

        assert_eq!(site.index.total_articles(), 0);
        let failed: Vec<_> = site.failures.iter().map(|f| f.source_id.as_str()).collect();
        assert_eq!(failed, vec!["b.md", "a.md"]);
        assert!(matches!(site.failures[0].error, ArticleError::DuplicateId { .. }));
        assert!(matches!(site.failures[1].error, ArticleError::Render(_)));
    }

    #[tokio::test]
    async fn test_render_keeps_input_order_under_concurrency() {
        let articles: Vec<RawArticle> = (0..50)
            .map(|i| raw(&format!("{:02}.md", i), &i.to_string(), "01-01-2024", "Blog", "same day"))
            .collect();
        let site = run_pipeline(Arc::new(MemorySource::new(articles))).await.unwrap();

        let ids: Vec<String> = site
            .index
            .articles()
            .map(|a| a.id().to_string())
            .collect();
        let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_site_lookup() {
        let source = Arc::new(MemorySource::new(vec![raw("a.md", "a", "01-01-2024", "Blog", "# Hi")]));
        let site = run_pipeline(source).await.unwrap();

        let article = site.article("a").unwrap();
        assert_eq!(article.content_text, "Hi");
        assert!(matches!(site.article("zzz"), Err(ArticleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cache_reuses_until_source_changes() {
        let mut memory = MemorySource::new(vec![raw("a.md", "a", "01-01-2024", "Blog", "one")]);
        let mut cache = IndexCache::new();

        let (first, rebuilt) = cache.refresh(Arc::new(memory.clone())).await.unwrap();
        assert!(rebuilt);

        let (second, rebuilt) = cache.refresh(Arc::new(memory.clone())).await.unwrap();
        assert!(!rebuilt);
        assert!(Arc::ptr_eq(&first, &second));

        memory.set(vec![
            raw("a.md", "a", "01-01-2024", "Blog", "one"),
            raw("b.md", "b", "02-01-2024", "Notes", "two"),
        ]);
        let (third, rebuilt) = cache.refresh(Arc::new(memory)).await.unwrap();
        assert!(rebuilt);
        assert_eq!(third.index.total_articles(), 2);
        assert_eq!(third.index.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_cache_invalidate() {
        let memory = MemorySource::new(vec![raw("a.md", "a", "01-01-2024", "Blog", "one")]);
        let mut cache = IndexCache::new();
        cache.refresh(Arc::new(memory.clone())).await.unwrap();
        cache.invalidate();
        assert!(cache.current().is_none());
        let (_, rebuilt) = cache.refresh(Arc::new(memory)).await.unwrap();
        assert!(rebuilt);
    }

    fn fetched(articles: Vec<RawArticle>) -> Fetched {
        Fetched {
            articles,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_fingerprint_sensitive_to_fields() {
        let a = raw("a.md", "a", "01-01-2024", "Blog", "one");
        let mut b = a.clone();
        b.subcategory = Some("Rust".to_string());
        assert_ne!(fingerprint(&fetched(vec![a.clone()])), fingerprint(&fetched(vec![b])));
        assert_eq!(fingerprint(&fetched(vec![a.clone()])), fingerprint(&fetched(vec![a])));
    }

    #[test]
    fn test_fingerprint_includes_fetch_failures() {
        let clean = fetched(Vec::new());
        let mut broken = fetched(Vec::new());
        broken
            .failures
            .push(Failure::new("x.md", ArticleError::Read("denied".to_string())));
        assert_ne!(fingerprint(&clean), fingerprint(&broken));
    }
}
