//! TOML configuration parsing and validation.
//!
//! ```toml
//! [content]
//! root = "./posts"
//! include_globs = ["**/*.md"]
//!
//! [summary]
//! recent_limit = 5
//! featured_limit = 6
//!
//! [author]
//! name = "Jane Doe"
//!
//! [[catalog]]
//! key = "ProfEmail"
//! title = "ProfEmail"
//! tags = ["Rust"]
//! ```
//!
//! Catalog entries are an array of tables so their declaration order is
//! kept; that order ranks the card projection.

use anyhow::{Context, Result};
use folio_core::models::CatalogEntry;
use folio_core::summary::{DEFAULT_FEATURED_LIMIT, DEFAULT_RECENT_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub author: Option<AuthorConfig>,
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummaryConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            featured_limit: DEFAULT_FEATURED_LIMIT,
        }
    }
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}
fn default_featured_limit() -> usize {
    DEFAULT_FEATURED_LIMIT
}

/// Author details passed through to the export bundle.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthorConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = parse_config(&content)?;

    // Relative content roots resolve against the config file's directory.
    if config.content.root.is_relative() {
        if let Some(dir) = path.parent() {
            config.content.root = dir.join(&config.content.root);
        }
    }

    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.content.include_globs.is_empty() {
        anyhow::bail!("content.include_globs must not be empty");
    }

    if config.summary.recent_limit < 1 {
        anyhow::bail!("summary.recent_limit must be >= 1");
    }
    if config.summary.featured_limit < 1 {
        anyhow::bail!("summary.featured_limit must be >= 1");
    }

    let mut seen = HashSet::new();
    for entry in &config.catalog {
        if entry.key.trim().is_empty() {
            anyhow::bail!("catalog entries must have a non-empty key");
        }
        if !seen.insert(entry.key.to_lowercase()) {
            anyhow::bail!("duplicate catalog key: '{}'", entry.key);
        }
    }

    Ok(config)
}
