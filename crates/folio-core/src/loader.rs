//! Front-matter parsing and article validation.
//!
//! A source document is Markdown with an optional YAML block fenced by
//! `---` lines at the very top. [`parse_document`] splits the two into a
//! [`RawArticle`]; [`load_articles`] validates required fields, parses
//! dates and rejects duplicate ids, preserving input order.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::{ArticleError, DateParseError, Failure, ValidationError};
use crate::models::{ArticleRecord, RawArticle, DATE_FORMAT};

/// Validated articles in input order, plus everything that was excluded.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub articles: Vec<ArticleRecord>,
    pub failures: Vec<Failure>,
}

/// Parse a `DD-MM-YYYY` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| DateParseError {
        value: text.to_string(),
    })
}

/// Split a document into its front-matter mapping and body.
///
/// Without a leading `---` line the whole text is body and the mapping is
/// empty.
pub fn parse_front_matter(text: &str) -> Result<(Mapping, &str), ValidationError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_fence_line(text) else {
        return Ok((Mapping::new(), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((parse_yaml_mapping(yaml)?, body));
        }
        offset += line.len();
    }

    Err(ValidationError::FrontMatter(
        "front matter block is never closed".to_string(),
    ))
}

/// Parse a source document into a [`RawArticle`].
///
/// `fallback_id` is used when the front matter does not set `id`.
pub fn parse_document(
    source_id: &str,
    fallback_id: &str,
    text: &str,
) -> Result<RawArticle, ValidationError> {
    let (meta, body) = parse_front_matter(text)?;

    Ok(RawArticle {
        source_id: source_id.to_string(),
        id: scalar(&meta, "id").or_else(|| Some(fallback_id.to_string())),
        title: scalar(&meta, "title"),
        date: scalar(&meta, "date"),
        category: scalar(&meta, "category"),
        subcategory: scalar(&meta, "subcategory"),
        body: body.to_string(),
    })
}

/// Validate one raw article. `ordinal` is its position in the batch.
pub fn validate(raw: RawArticle, ordinal: usize) -> Result<ArticleRecord, ValidationError> {
    let id = required(raw.id, "id")?;
    let title = required(raw.title, "title")?;
    let date = required(raw.date, "date")?;
    let category = required(raw.category, "category")?;
    let published = parse_date(&date)?;

    Ok(ArticleRecord {
        source_id: raw.source_id,
        ordinal,
        id,
        title,
        date,
        published,
        category,
        subcategory: present(raw.subcategory),
        body_raw: raw.body,
    })
}

/// Validate a batch. Invalid records and later duplicates are excluded and
/// reported; the batch always completes.
pub fn load_articles<I>(raws: I) -> LoadReport
where
    I: IntoIterator<Item = RawArticle>,
{
    let mut report = LoadReport::default();
    let mut first_source: HashMap<String, String> = HashMap::new();

    for (ordinal, raw) in raws.into_iter().enumerate() {
        let source_id = raw.source_id.clone();
        let record = match validate(raw, ordinal) {
            Ok(record) => record,
            Err(err) => {
                warn!(source = %source_id, error = %err, "excluding invalid article");
                report.failures.push(Failure::new(source_id, err));
                continue;
            }
        };

        if let Some(first) = first_source.get(&record.id) {
            let err = ArticleError::DuplicateId {
                id: record.id.clone(),
                first_source: first.clone(),
            };
            warn!(source = %source_id, error = %err, "excluding duplicate article");
            report.failures.push(Failure::new(source_id, err));
            continue;
        }

        first_source.insert(record.id.clone(), record.source_id.clone());
        report.articles.push(record);
    }

    report
}

fn strip_fence_line(text: &str) -> Option<&str> {
    let end = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
    if text[..end].trim_end() == "---" {
        Some(&text[end..])
    } else {
        None
    }
}

fn parse_yaml_mapping(yaml: &str) -> Result<Mapping, ValidationError> {
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| ValidationError::FrontMatter(e.to_string()))?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ValidationError::FrontMatter(
            "front matter must be a key/value mapping".to_string(),
        )),
    }
}

/// Read a scalar field as text; numbers and booleans are stringified.
fn scalar(meta: &Mapping, key: &str) -> Option<String> {
    match meta.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    present(value).ok_or(ValidationError::MissingField(field))
}
