//! Filesystem article source.
//!
//! Walks the configured content root, keeps files matching the include
//! globs and not matching the exclude globs, and parses each file's front
//! matter. Entries are sorted by relative path for deterministic input
//! order. An article's default id is its relative path without the `.md`
//! extension.

use anyhow::{bail, Result};
use async_trait::async_trait;
use folio_core::error::ArticleError;
use folio_core::loader::parse_document;
use folio_core::models::RawArticle;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ContentConfig;
use crate::traits::ArticleSource;

pub struct FilesystemSource {
    config: ContentConfig,
}

impl FilesystemSource {
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, source_id: &str) -> PathBuf {
        self.config.root.join(source_id)
    }
}

#[async_trait]
impl ArticleSource for FilesystemSource {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn list(&self) -> Result<Vec<String>> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || scan_filesystem(&config)).await?
    }

    async fn fetch(&self, source_id: &str) -> Result<RawArticle, ArticleError> {
        let path = self.path_for(source_id);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ArticleError::Read(format!("{}: {}", path.display(), e)))?;

        Ok(parse_document(source_id, &default_id(source_id), &text)?)
    }
}

/// Relative paths (with `/` separators) of every matching file, sorted.
pub fn scan_filesystem(config: &ContentConfig) -> Result<Vec<String>> {
    let root = &config.root;
    if !root.exists() {
        bail!("Content root does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut entries = Vec::new();

    let walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) {
            continue;
        }

        if !include_set.is_match(&rel_str) {
            continue;
        }

        debug!(file = %rel_str, "found article source");
        entries.push(rel_str);
    }

    entries.sort();

    Ok(entries)
}

/// `notes/hello.md` → `notes/hello`.
pub fn default_id(source_id: &str) -> String {
    source_id
        .strip_suffix(".md")
        .unwrap_or(source_id)
        .to_string()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
