//! Card projection against a curated catalog.
//!
//! Each subcategory group becomes a card, and each non-empty uncategorized
//! bucket becomes one more card after its category's subcategories. Cards
//! are then matched against the catalog and reordered so that catalog
//! precedence wins.
//!
//! # Matching
//!
//! 1. Exact case-insensitive key equality, in any catalog position.
//! 2. Otherwise the first entry, in declaration order, whose key contains
//!    the card name or is contained by it (case-insensitive).
//!
//! There is no minimum length and no word-boundary check, so a very short
//! key such as `"a"` matches most names.

use crate::models::{Card, CardKind, CatalogEntry, HierarchicalIndex, RenderedArticle};

/// Project the index into cards ordered by catalog precedence.
///
/// Matched cards come first, ordered by their entry's catalog position;
/// unmatched cards follow in emission order. An empty catalog leaves the
/// emission order untouched.
pub fn project(index: &HierarchicalIndex, catalog: &[CatalogEntry]) -> Vec<Card> {
    let mut matched: Vec<(usize, Card)> = Vec::new();
    let mut unmatched: Vec<Card> = Vec::new();

    for mut card in emit_cards(index) {
        match match_catalog(&card.title, catalog) {
            Some(rank) => {
                let entry = catalog[rank].clone();
                card.title = entry.title.clone();
                card.catalog_entry = Some(entry);
                matched.push((rank, card));
            }
            None => unmatched.push(card),
        }
    }

    matched.sort_by_key(|(rank, _)| *rank);
    matched
        .into_iter()
        .map(|(_, card)| card)
        .chain(unmatched)
        .collect()
}

/// Cards in hierarchy order, before any catalog matching.
pub fn emit_cards(index: &HierarchicalIndex) -> Vec<Card> {
    let mut cards = Vec::new();

    for (category_index, node) in index.categories.iter().enumerate() {
        for (sub_index, group) in node.subcategories.iter().enumerate() {
            cards.push(Card {
                id: format!("cat-{}-sub-{}", category_index, sub_index),
                title: group.subcategory.clone(),
                category: node.category.clone(),
                articles: group.articles.iter().map(RenderedArticle::item).collect(),
                kind: CardKind::Subcategory,
                catalog_entry: None,
            });
        }

        if !node.uncategorized_articles.is_empty() {
            cards.push(Card {
                id: format!("cat-{}-uncat", category_index),
                title: node.category.clone(),
                category: node.category.clone(),
                articles: node
                    .uncategorized_articles
                    .iter()
                    .map(RenderedArticle::item)
                    .collect(),
                kind: CardKind::Category,
                catalog_entry: None,
            });
        }
    }

    cards
}

/// Position of the catalog entry matching `name`, if any.
pub fn match_catalog(name: &str, catalog: &[CatalogEntry]) -> Option<usize> {
    let name = name.to_lowercase();
    let keys: Vec<String> = catalog.iter().map(|e| e.key.to_lowercase()).collect();

    keys.iter().position(|key| *key == name).or_else(|| {
        keys.iter()
            .position(|key| name.contains(key.as_str()) || key.contains(name.as_str()))
    })
}
