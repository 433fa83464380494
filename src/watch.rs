//! `folio watch`: rebuild the index whenever the content changes.
//!
//! Polls the source on a fixed interval through [`IndexCache`]. A poll
//! whose fingerprint matches the cached site does no rendering; any change
//! discards the cached site and rebuilds the whole index from scratch.
//! With `--output`, every rebuild re-writes the export file.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::export::run_export;
use crate::ingest::{IndexCache, Site};
use crate::traits::ArticleSource;

/// One poll: refresh the cache and, if rebuilt, report and export.
///
/// Returns whether the site was rebuilt.
pub async fn poll_once(
    config: &Config,
    cache: &mut IndexCache,
    source: Arc<dyn ArticleSource>,
    output: Option<&Path>,
) -> Result<bool> {
    let (site, rebuilt) = cache.refresh(source).await?;
    if rebuilt {
        announce(&site);
        if let Some(path) = output {
            run_export(config, &site, Some(path))?;
        }
    }
    Ok(rebuilt)
}

fn announce(site: &Site) {
    info!(fingerprint = %site.fingerprint, "index rebuilt");
    eprintln!(
        "Rebuilt index: {} articles in {} categories, {} excluded",
        site.index.total_articles(),
        site.index.categories.len(),
        site.failures.len()
    );
}

/// Poll until interrupted with Ctrl-C.
pub async fn run_watch(
    config: &Config,
    source: Arc<dyn ArticleSource>,
    interval: Duration,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut cache = IndexCache::new();
    poll_once(config, &mut cache, Arc::clone(&source), output.as_deref()).await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Stopping watch.");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {
                if let Err(e) = poll_once(config, &mut cache, Arc::clone(&source), output.as_deref()).await {
                    warn!(error = %e, "rebuild failed; keeping previous index");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::traits::MemorySource;
    use folio_core::models::RawArticle;

    fn raw(id: &str) -> RawArticle {
        RawArticle {
            source_id: format!("{}.md", id),
            id: Some(id.to_string()),
            title: Some(id.to_string()),
            date: Some("01-01-2024".to_string()),
            category: Some("Blog".to_string()),
            subcategory: None,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_poll_exports_only_on_change() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("site.json");
        let config = parse_config("[content]\nroot = \"posts\"\n").unwrap();
        let mut cache = IndexCache::new();
        let mut memory = MemorySource::new(vec![raw("a")]);

        assert!(poll_once(&config, &mut cache, Arc::new(memory.clone()), Some(out.as_path()))
            .await
            .unwrap());
        assert!(out.exists());

        std::fs::remove_file(&out).unwrap();
        assert!(!poll_once(&config, &mut cache, Arc::new(memory.clone()), Some(out.as_path()))
            .await
            .unwrap());
        assert!(!out.exists());

        memory.set(vec![raw("a"), raw("b")]);
        assert!(poll_once(&config, &mut cache, Arc::new(memory), Some(out.as_path()))
            .await
            .unwrap());
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["summary"]["totalArticles"], 2);
    }
}
