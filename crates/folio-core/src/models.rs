//! Core data models used throughout Folio.
//!
//! These types represent the articles, hierarchy nodes, catalog entries and
//! cards that flow through the ingestion and indexing pipeline. Everything
//! that crosses the presentation boundary serialises with camelCase keys.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Textual date format stored in front matter (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Raw item produced by a source before validation.
///
/// Metadata fields are optional here; [`crate::loader::load_articles`]
/// decides which are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    /// Where the item came from (relative path for filesystem sources).
    pub source_id: String,
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub body: String,
}

/// A validated article. Immutable once it has been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub source_id: String,
    /// Position in the loaded input sequence; breaks date ties.
    pub ordinal: usize,
    pub id: String,
    pub title: String,
    /// Date exactly as written (`DD-MM-YYYY`).
    pub date: String,
    /// Parsed form of `date`, the ordering key.
    pub published: NaiveDate,
    pub category: String,
    pub subcategory: Option<String>,
    pub body_raw: String,
}

/// An article with its display HTML and plain-text derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    pub article: ArticleRecord,
    pub content_display: String,
    pub content_text: String,
}

impl RenderedArticle {
    pub fn id(&self) -> &str {
        &self.article.id
    }

    pub fn published(&self) -> NaiveDate {
        self.article.published
    }

    pub fn item(&self) -> ArticleItem {
        ArticleItem::from(self)
    }

    pub fn bundle(&self) -> ArticleBundle {
        ArticleBundle {
            id: self.article.id.clone(),
            title: self.article.title.clone(),
            category: self.article.category.clone(),
            date: self.article.date.clone(),
            content_display: self.content_display.clone(),
            content_text: self.content_text.clone(),
        }
    }
}

/// Listing shape of an article: metadata only, no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl From<&RenderedArticle> for ArticleItem {
    fn from(rendered: &RenderedArticle) -> Self {
        let a = &rendered.article;
        Self {
            id: a.id.clone(),
            title: a.title.clone(),
            date: a.date.clone(),
            category: a.category.clone(),
            subcategory: a.subcategory.clone(),
        }
    }
}

/// Per-article render bundle handed to the article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBundle {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: String,
    #[serde(rename = "contentHtml")]
    pub content_display: String,
    pub content_text: String,
}

/// Articles sharing one subcategory, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryGroup {
    pub subcategory: String,
    #[serde(serialize_with = "serialize_items")]
    pub articles: Vec<RenderedArticle>,
}

/// One category with its subcategory groups and uncategorized bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub category: String,
    pub subcategories: Vec<SubcategoryGroup>,
    #[serde(serialize_with = "serialize_items")]
    pub uncategorized_articles: Vec<RenderedArticle>,
}

impl CategoryNode {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategories: Vec::new(),
            uncategorized_articles: Vec::new(),
        }
    }

    /// Every article in this category: uncategorized first, then each
    /// subcategory in stored order.
    pub fn articles(&self) -> impl Iterator<Item = &RenderedArticle> {
        self.uncategorized_articles
            .iter()
            .chain(self.subcategories.iter().flat_map(|g| g.articles.iter()))
    }

    pub fn article_count(&self) -> usize {
        self.uncategorized_articles.len()
            + self
                .subcategories
                .iter()
                .map(|g| g.articles.len())
                .sum::<usize>()
    }
}

/// Ordered category nodes; see [`crate::hierarchy::build_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HierarchicalIndex {
    pub categories: Vec<CategoryNode>,
}

/// Curated metadata for a card, matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Name matched against card titles.
    pub key: String,
    /// Display title that replaces the card title on a match.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Link to a live deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Category,
    Subcategory,
}

/// A presentation card for one subcategory or one uncategorized bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    pub category: String,
    pub articles: Vec<ArticleItem>,
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_entry: Option<CatalogEntry>,
}

/// Category name to article listing, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap(pub Vec<(String, Vec<ArticleItem>)>);

impl CategoryMap {
    pub fn get(&self, category: &str) -> Option<&[ArticleItem]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, items) in &self.0 {
            map.serialize_entry(category, items)?;
        }
        map.end()
    }
}

fn serialize_items<S: Serializer>(
    articles: &[RenderedArticle],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(articles.iter().map(ArticleItem::from))
}
