//! Read-only views of the index: `folio tree`, `categories`, `cards`,
//! `summary` and `featured`.

use anyhow::Result;
use folio_core::models::{Card, CardKind, CategoryMap};
use folio_core::summary::featured;
use folio_core::tree::render_tree;
use std::fmt::Write;

use crate::config::Config;
use crate::ingest::Site;

pub fn run_tree(site: &Site) -> Result<()> {
    if site.index.is_empty() {
        println!("No articles.");
        return Ok(());
    }
    print!("{}", render_tree(&site.index));
    Ok(())
}

/// One line per category, its articles indented below.
pub fn format_categories(map: &CategoryMap) -> String {
    let mut out = String::new();
    for (category, items) in &map.0 {
        let _ = writeln!(out, "{} ({})", category, items.len());
        for item in items {
            let _ = writeln!(out, "  {:<24} {}  {}", item.id, item.date, item.title);
        }
    }
    out
}

pub fn run_categories(site: &Site) -> Result<()> {
    print!("{}", format_categories(&site.index.category_map()));
    Ok(())
}

pub fn format_cards(cards: &[Card]) -> String {
    let mut out = String::new();
    for card in cards {
        let kind = match card.kind {
            CardKind::Category => "category",
            CardKind::Subcategory => "subcategory",
        };
        let marker = if card.catalog_entry.is_some() { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:<20} {:<12} {}{} [{} article(s)]",
            card.id,
            kind,
            card.title,
            marker,
            card.articles.len()
        );
    }
    out
}

pub fn run_cards(config: &Config, site: &Site, json: bool) -> Result<()> {
    let cards = site.cards(&config.catalog);
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", format_cards(&cards));
    }
    Ok(())
}

pub fn run_summary(config: &Config, site: &Site) -> Result<()> {
    let summary = site.summary(config.summary.recent_limit);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn run_featured(config: &Config, site: &Site, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(config.summary.featured_limit);
    let items = featured(&site.index, limit);
    if items.is_empty() {
        println!("No articles.");
    }
    for item in items {
        println!("{}  {}  ({})", item.date, item.title, item.id);
    }
    Ok(())
}
