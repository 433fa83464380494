use crate::loader::parse_date;
use crate::models::{ArticleRecord, RenderedArticle};

pub(crate) fn rendered(
    ordinal: usize,
    id: &str,
    date: &str,
    category: &str,
    subcategory: Option<&str>,
) -> RenderedArticle {
    RenderedArticle {
        article: ArticleRecord {
            source_id: format!("{}.md", id),
            ordinal,
            id: id.to_string(),
            title: format!("Article {}", id),
            date: date.to_string(),
            published: parse_date(date).unwrap(),
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            body_raw: String::new(),
        },
        content_display: String::new(),
        content_text: String::new(),
    }
}
