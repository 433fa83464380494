//! Build report for `folio check`.
//!
//! Loads and renders the whole collection, prints totals and every
//! excluded article with its reason. The command fails when anything was
//! excluded, so it can gate a CI build of the static site.

use anyhow::{bail, Result};
use std::fmt::Write;

use crate::config::Config;
use crate::ingest::Site;

/// Human-readable report of one build.
pub fn format_report(config: &Config, site: &Site) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Folio Build Report");
    let _ = writeln!(out, "==================");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Content root: {}", config.content.root.display());
    let _ = writeln!(out, "  Fingerprint:  {}", &site.fingerprint[..12]);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Articles:     {}", site.index.total_articles());
    let _ = writeln!(out, "  Categories:   {}", site.index.categories.len());
    let _ = writeln!(out, "  Excluded:     {}", site.failures.len());

    if !site.index.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {:<32} {:>8} {:>14}", "CATEGORY", "ARTICLES", "SUBCATEGORIES");
        let _ = writeln!(out, "  {}", "-".repeat(56));
        for node in &site.index.categories {
            let _ = writeln!(
                out,
                "  {:<32} {:>8} {:>14}",
                node.category,
                node.article_count(),
                node.subcategories.len()
            );
        }
    }

    if !site.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Excluded articles:");
        for failure in &site.failures {
            let _ = writeln!(out, "    {}", failure);
        }
    }

    out
}

/// Print the report; error if any article was excluded.
pub fn run_check(config: &Config, site: &Site) -> Result<()> {
    println!("{}", format_report(config, site));
    if !site.failures.is_empty() {
        bail!("{} article(s) excluded from the index", site.failures.len());
    }
    Ok(())
}
