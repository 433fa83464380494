//! Category → subcategory grouping with deterministic ordering.
//!
//! # Algorithm
//!
//! 1. Walk the input once. A category node is created the first time its
//!    name is seen; the outer sequence keeps that first-seen order.
//! 2. Inside a category, articles without a subcategory go to the
//!    uncategorized bucket; the rest go to a group created on first sight.
//! 3. Every bucket is stable-sorted by date, newest first, so equal dates
//!    keep their input order.
//!
//! First-seen order lives in the node vectors themselves; side maps only
//! translate a name into a position and are never iterated.

use std::collections::HashMap;

use crate::error::NotFoundError;
use crate::models::{
    ArticleBundle, CategoryMap, CategoryNode, HierarchicalIndex, RenderedArticle,
    SubcategoryGroup,
};

/// Group rendered articles into the two-level hierarchy.
pub fn build_index(articles: Vec<RenderedArticle>) -> HierarchicalIndex {
    let mut categories: Vec<CategoryNode> = Vec::new();
    let mut category_slots: HashMap<String, usize> = HashMap::new();
    let mut subcategory_slots: Vec<HashMap<String, usize>> = Vec::new();

    for rendered in articles {
        let category = &rendered.article.category;
        let slot = match category_slots.get(category) {
            Some(&slot) => slot,
            None => {
                let slot = categories.len();
                categories.push(CategoryNode::new(category.clone()));
                category_slots.insert(category.clone(), slot);
                subcategory_slots.push(HashMap::new());
                slot
            }
        };

        let node = &mut categories[slot];
        let Some(subcategory) = rendered.article.subcategory.clone() else {
            node.uncategorized_articles.push(rendered);
            continue;
        };

        let groups = &mut subcategory_slots[slot];
        let group = match groups.get(&subcategory) {
            Some(&group) => group,
            None => {
                let group = node.subcategories.len();
                node.subcategories.push(SubcategoryGroup {
                    subcategory: subcategory.clone(),
                    articles: Vec::new(),
                });
                groups.insert(subcategory, group);
                group
            }
        };
        node.subcategories[group].articles.push(rendered);
    }

    for node in &mut categories {
        sort_newest_first(&mut node.uncategorized_articles);
        for group in &mut node.subcategories {
            sort_newest_first(&mut group.articles);
        }
    }

    HierarchicalIndex { categories }
}

/// Stable sort by date, newest first.
pub fn sort_newest_first(articles: &mut [RenderedArticle]) {
    articles.sort_by(|a, b| b.published().cmp(&a.published()));
}

impl HierarchicalIndex {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_articles(&self) -> usize {
        self.categories.iter().map(CategoryNode::article_count).sum()
    }

    /// All reachable articles in hierarchy order.
    pub fn articles(&self) -> impl Iterator<Item = &RenderedArticle> {
        self.categories.iter().flat_map(|node| node.articles())
    }

    pub fn category(&self, name: &str) -> Option<&CategoryNode> {
        self.categories.iter().find(|node| node.category == name)
    }

    /// Look up a single article by id.
    pub fn find(&self, id: &str) -> Result<&RenderedArticle, NotFoundError> {
        self.articles()
            .find(|a| a.id() == id)
            .ok_or_else(|| NotFoundError { id: id.to_string() })
    }

    /// Flat view: each category with its full article list.
    pub fn category_map(&self) -> CategoryMap {
        CategoryMap(
            self.categories
                .iter()
                .map(|node| {
                    let items = node.articles().map(RenderedArticle::item).collect();
                    (node.category.clone(), items)
                })
                .collect(),
        )
    }

    /// Render bundles for every article, in hierarchy order.
    pub fn bundles(&self) -> Vec<ArticleBundle> {
        self.articles().map(RenderedArticle::bundle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::rendered;
    use pretty_assertions::assert_eq;

    fn ids(articles: &[RenderedArticle]) -> Vec<&str> {
        articles.iter().map(|a| a.id()).collect()
    }

    #[test]
    fn test_empty_input() {
        let index = build_index(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.total_articles(), 0);
    }

    #[test]
    fn test_uncategorized_sorted_newest_first() {
        let index = build_index(vec![
            rendered(0, "1", "01-02-2024", "Blog", None),
            rendered(1, "2", "15-03-2024", "Blog", None),
        ]);

        assert_eq!(index.categories.len(), 1);
        let blog = &index.categories[0];
        assert_eq!(blog.category, "Blog");
        assert!(blog.subcategories.is_empty());
        assert_eq!(ids(&blog.uncategorized_articles), vec!["2", "1"]);
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let index = build_index(vec![
            rendered(0, "1", "01-01-2024", "Blog", None),
            rendered(1, "2", "01-01-2024", "Blog", None),
            rendered(2, "3", "01-01-2024", "Blog", Some("Rust")),
            rendered(3, "4", "01-01-2024", "Blog", Some("Rust")),
        ]);

        let blog = &index.categories[0];
        assert_eq!(ids(&blog.uncategorized_articles), vec!["1", "2"]);
        assert_eq!(ids(&blog.subcategories[0].articles), vec!["3", "4"]);
    }

    #[test]
    fn test_first_seen_order() {
        let index = build_index(vec![
            rendered(0, "a", "01-01-2024", "Zeta", Some("Second")),
            rendered(1, "b", "01-01-2024", "Alpha", None),
            rendered(2, "c", "01-01-2024", "Zeta", Some("First")),
            rendered(3, "d", "01-01-2024", "Zeta", Some("Second")),
        ]);

        let names: Vec<_> = index.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);

        let subs: Vec<_> = index.categories[0]
            .subcategories
            .iter()
            .map(|g| g.subcategory.as_str())
            .collect();
        assert_eq!(subs, vec!["Second", "First"]);
        assert_eq!(ids(&index.categories[0].subcategories[0].articles), vec!["a", "d"]);
    }

    #[test]
    fn test_same_subcategory_name_in_two_categories() {
        let index = build_index(vec![
            rendered(0, "a", "01-01-2024", "Blog", Some("Misc")),
            rendered(1, "b", "01-01-2024", "Projects", Some("Misc")),
        ]);
        assert_eq!(index.categories[0].subcategories[0].articles.len(), 1);
        assert_eq!(index.categories[1].subcategories[0].articles.len(), 1);
    }

    #[test]
    fn test_category_map_order() {
        let index = build_index(vec![
            rendered(0, "s1", "01-01-2024", "Blog", Some("Rust")),
            rendered(1, "u1", "01-01-2023", "Blog", None),
            rendered(2, "s2", "05-01-2024", "Blog", Some("Rust")),
        ]);

        let map = index.category_map();
        let items: Vec<_> = map.get("Blog").unwrap().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(items, vec!["u1", "s2", "s1"]);
        assert!(map.get("Nope").is_none());
    }

    #[test]
    fn test_category_map_serialises_in_index_order() {
        let index = build_index(vec![
            rendered(0, "z", "01-01-2024", "Zeta", None),
            rendered(1, "a", "01-01-2024", "Alpha", None),
        ]);
        let json = serde_json::to_string(&index.category_map()).unwrap();
        assert!(json.find("Zeta").unwrap() < json.find("Alpha").unwrap());
    }

    #[test]
    fn test_find() {
        let index = build_index(vec![rendered(0, "x", "01-01-2024", "Blog", None)]);
        assert_eq!(index.find("x").unwrap().id(), "x");
        assert_eq!(
            index.find("missing").unwrap_err(),
            NotFoundError {
                id: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_hierarchy_serialises_items_only() {
        let index = build_index(vec![rendered(0, "x", "01-01-2024", "Blog", None)]);
        let value = serde_json::to_value(&index).unwrap();
        let article = &value[0]["uncategorizedArticles"][0];
        assert_eq!(article["id"], "x");
        assert!(article.get("contentText").is_none());
    }
}
