//! Single-article retrieval by id.
//!
//! Used by the `folio get` command. A missing id surfaces as
//! [`ArticleError::NotFound`], which the presentation layer maps to a
//! page-not-found condition.

use anyhow::Result;
use folio_core::error::ArticleError;
use folio_core::models::ArticleBundle;
use folio_core::tree::format_display_date;

use crate::ingest::Site;

/// Core lookup returning the render bundle (used by the CLI and export).
pub fn get_article(site: &Site, id: &str) -> Result<ArticleBundle, ArticleError> {
    Ok(site.article(id)?.bundle())
}

/// CLI entry point: print one article, or its JSON bundle.
pub fn run_get(site: &Site, id: &str, json: bool) -> Result<()> {
    let article = site.article(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&article.bundle())?);
        return Ok(());
    }

    let record = &article.article;
    println!("--- Article ---");
    println!("id:          {}", record.id);
    println!("title:       {}", record.title);
    println!("date:        {}", format_display_date(record.published));
    println!("category:    {}", record.category);
    if let Some(ref sub) = record.subcategory {
        println!("subcategory: {}", sub);
    }
    println!("source:      {}", record.source_id);
    println!();

    println!("--- Text ---");
    println!("{}", article.content_text);

    Ok(())
}
