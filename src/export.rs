//! Export the index as JSON for the presentation layer.
//!
//! Produces one document holding the flat category map, the hierarchy,
//! the card projection, every article's render bundle, the featured list
//! and the context summary, plus the author block from the config. The
//! static front end and the assistant context feed read this file instead
//! of re-parsing Markdown.

use anyhow::Result;
use folio_core::models::{ArticleBundle, ArticleItem, Card, CategoryMap, HierarchicalIndex};
use folio_core::summary::{featured, ContextSummary};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::config::{AuthorConfig, Config};
use crate::ingest::Site;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a AuthorConfig>,
    pub categorised_articles: CategoryMap,
    pub hierarchical_articles: &'a HierarchicalIndex,
    pub project_cards: Vec<Card>,
    pub featured_articles: Vec<ArticleItem>,
    pub article_contents: Vec<ArticleBundle>,
    pub summary: ContextSummary,
}

pub fn build_export<'a>(config: &'a Config, site: &'a Site) -> ExportData<'a> {
    ExportData {
        author: config.author.as_ref(),
        categorised_articles: site.index.category_map(),
        hierarchical_articles: &site.index,
        project_cards: site.cards(&config.catalog),
        featured_articles: featured(&site.index, config.summary.featured_limit),
        article_contents: site.index.bundles(),
        summary: site.summary(config.summary.recent_limit),
    }
}

/// Export the site as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_export(config: &Config, site: &Site, output: Option<&Path>) -> Result<()> {
    let data = build_export(config, site);
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            info!(
                articles = data.article_contents.len(),
                cards = data.project_cards.len(),
                path = %path.display(),
                "exported site"
            );
            eprintln!(
                "Exported {} articles, {} cards to {}",
                data.article_contents.len(),
                data.project_cards.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
