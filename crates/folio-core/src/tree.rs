//! Plain-text rendering of the category tree.
//!
//! ```text
//! Blog
//! ├── Hello world · Mar 15, 2024
//! └── Rust
//!     └── Ownership · Feb 1, 2024
//! ```
//!
//! Within a category the uncategorized articles come first, then each
//! subcategory with its articles.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{CategoryNode, HierarchicalIndex, RenderedArticle};

/// Display form of a date, e.g. `Mar 15, 2024`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn render_tree(index: &HierarchicalIndex) -> String {
    let mut out = String::new();
    for node in &index.categories {
        write_category(&mut out, node);
    }
    out
}

fn write_category(out: &mut String, node: &CategoryNode) {
    let _ = writeln!(out, "{}", node.category);

    let children = node.uncategorized_articles.len() + node.subcategories.len();
    let mut position = 0;

    for article in &node.uncategorized_articles {
        position += 1;
        write_article(out, "", position == children, article);
    }

    for group in &node.subcategories {
        position += 1;
        let last = position == children;
        let _ = writeln!(out, "{}{}", branch(last), group.subcategory);

        let indent = if last { "    " } else { "│   " };
        for (i, article) in group.articles.iter().enumerate() {
            write_article(out, indent, i + 1 == group.articles.len(), article);
        }
    }
}

fn write_article(out: &mut String, indent: &str, last: bool, article: &RenderedArticle) {
    let _ = writeln!(
        out,
        "{}{}{} · {}",
        indent,
        branch(last),
        article.article.title,
        format_display_date(article.published())
    );
}

fn branch(last: bool) -> &'static str {
    if last {
        "└── "
    } else {
        "├── "
    }
}
