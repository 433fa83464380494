//! Compact summaries of the index for the assistant context feed.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{ArticleItem, HierarchicalIndex, RenderedArticle};

/// Number of recent articles included when no limit is configured.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Number of featured articles shown when no limit is configured.
pub const DEFAULT_FEATURED_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    pub total_articles: usize,
    pub categories: Vec<String>,
    pub articles_by_category: CategoryCounts,
    pub recent_articles: Vec<RecentArticle>,
}

/// Article count per category, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(pub Vec<(String, usize)>);

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, count) in &self.0 {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentArticle {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: String,
}

pub fn summarize(index: &HierarchicalIndex, recent_limit: usize) -> ContextSummary {
    let counts: Vec<(String, usize)> = index
        .categories
        .iter()
        .map(|node| (node.category.clone(), node.article_count()))
        .collect();

    ContextSummary {
        total_articles: index.total_articles(),
        categories: counts.iter().map(|(name, _)| name.clone()).collect(),
        articles_by_category: CategoryCounts(counts),
        recent_articles: newest(index, recent_limit)
            .into_iter()
            .map(|a| RecentArticle {
                id: a.article.id.clone(),
                title: a.article.title.clone(),
                category: a.article.category.clone(),
                date: a.article.date.clone(),
            })
            .collect(),
    }
}

/// The `limit` newest articles across the whole index.
///
/// Equal dates are ordered by input position, the same tie-break the
/// hierarchy buckets use.
pub fn newest(index: &HierarchicalIndex, limit: usize) -> Vec<&RenderedArticle> {
    let mut all: Vec<&RenderedArticle> = index.articles().collect();
    all.sort_by(|a, b| {
        b.published()
            .cmp(&a.published())
            .then(a.article.ordinal.cmp(&b.article.ordinal))
    });
    all.truncate(limit);
    all
}

/// Featured listing: newest articles as listing items.
pub fn featured(index: &HierarchicalIndex, limit: usize) -> Vec<ArticleItem> {
    newest(index, limit)
        .into_iter()
        .map(RenderedArticle::item)
        .collect()
}
