//! Markdown rendering and plain-text derivation.
//!
//! Bodies are rendered to HTML with pulldown-cmark. The plain-text form is
//! derived from that HTML by [`strip_and_collapse`], which is idempotent.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;
use tracing::warn;

use crate::error::{Failure, RenderError};
use crate::models::{ArticleRecord, RenderedArticle};

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Rendered articles in input order, plus the ones that failed.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub articles: Vec<RenderedArticle>,
    pub failures: Vec<Failure>,
}

/// Render one article's body into display HTML and plain text.
pub fn render(article: ArticleRecord) -> Result<RenderedArticle, RenderError> {
    check_structure(&article.body_raw)?;

    let content_display = markdown_to_html(&article.body_raw);
    let content_text = strip_and_collapse(&content_display);

    Ok(RenderedArticle {
        article,
        content_display,
        content_text,
    })
}

/// Render a batch, excluding failures instead of aborting.
pub fn render_all(articles: Vec<ArticleRecord>) -> RenderReport {
    let mut report = RenderReport::default();
    for article in articles {
        let source_id = article.source_id.clone();
        match render(article) {
            Ok(rendered) => report.articles.push(rendered),
            Err(err) => {
                warn!(source = %source_id, error = %err, "excluding unrenderable article");
                report.failures.push(Failure::new(source_id, err));
            }
        }
    }
    report
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Remove markup and normalise whitespace.
///
/// Tags are removed, stray angle brackets dropped, every whitespace run
/// becomes one space and the result is trimmed.
pub fn strip_and_collapse(html: &str) -> String {
    let without_tags = TAG.replace_all(html, "");
    let without_brackets = without_tags.replace(['<', '>'], "");
    WHITESPACE
        .replace_all(&without_brackets, " ")
        .trim()
        .to_string()
}

/// Reject bodies that Markdown would silently mangle: a code fence that is
/// never closed swallows the rest of the article, and NUL is replaced.
///
/// Fenced blocks are located by the same parser that renders the body, so
/// indented code and fence-like lines inside other blocks are never
/// mistaken for fences.
fn check_structure(body: &str) -> Result<(), RenderError> {
    if let Some(offset) = body.find('\0') {
        return Err(RenderError::NulCharacter { offset });
    }

    for (event, range) in Parser::new_ext(body, options()).into_offset_iter() {
        if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) = event {
            if !fence_is_closed(body, range.clone()) {
                let line = body[..range.start].matches('\n').count() + 1;
                return Err(RenderError::UnclosedFence { line });
            }
        }
    }

    Ok(())
}

/// Whether the fenced block spanning `range` ends on its own closing fence:
/// the opening marker, at least as many times, indented at most three
/// spaces inside its container and followed only by whitespace.
fn fence_is_closed(body: &str, range: Range<usize>) -> bool {
    let block = &body[range.clone()];
    let Some(fence_at) = block.find(['`', '~']) else {
        return false;
    };
    let opener = &block[fence_at..];
    let marker = if opener.starts_with('`') { '`' } else { '~' };
    let len = opener.chars().take_while(|c| *c == marker).count();

    let line_start = body[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let container = body[line_start..range.start + fence_at].chars().count();

    let Some((_, last)) = block.trim_end().rsplit_once('\n') else {
        return false;
    };
    let inner = strip_container(last, container);
    let indent = inner.len() - inner.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }

    let rest = &inner[indent..];
    let run = rest.chars().take_while(|c| *c == marker).count();
    run >= len && rest[run..].trim().is_empty()
}

/// Drop up to `width` columns of container prefix (indent or `>`).
fn strip_container(line: &str, width: usize) -> &str {
    let skip: usize = line
        .chars()
        .take(width)
        .take_while(|c| matches!(c, ' ' | '\t' | '>'))
        .map(char::len_utf8)
        .sum();
    &line[skip..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(body: &str) -> ArticleRecord {
        ArticleRecord {
            source_id: "a.md".to_string(),
            ordinal: 0,
            id: "a".to_string(),
            title: "A".to_string(),
            date: "01-01-2024".to_string(),
            published: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: "Blog".to_string(),
            subcategory: None,
            body_raw: body.to_string(),
        }
    }

    #[test]
    fn test_render_markdown() {
        let rendered = render(record("# Title\n\nSome *emphasis* here.")).unwrap();
        assert!(rendered.content_display.contains("<h1>Title</h1>"));
        assert!(rendered.content_display.contains("<em>emphasis</em>"));
        assert_eq!(rendered.content_text, "Title Some emphasis here.");
    }

    #[test]
    fn test_render_deterministic() {
        let body = "| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n";
        let a = render(record(body)).unwrap();
        let b = render(record(body)).unwrap();
        assert_eq!(a.content_display, b.content_display);
        assert_eq!(a.content_text, b.content_text);
    }

    #[test]
    fn test_strip_and_collapse() {
        let text = strip_and_collapse("<p>Hello\n\n  <b>world</b></p>\n<p>\tagain </p>");
        assert_eq!(text, "Hello world again");
    }

    #[test]
    fn test_strip_drops_stray_brackets() {
        let text = strip_and_collapse("<p>a</p> <div unclosed");
        assert_eq!(text, "a div unclosed");
        assert!(!text.contains('<') && !text.contains('>'));
    }

    #[test]
    fn test_strip_idempotent() {
        let once = strip_and_collapse("<ul>\n<li>one</li>\n<li>two  three</li>\n</ul>\n");
        assert_eq!(strip_and_collapse(&once), once);
    }

    #[test]
    fn test_escaped_angle_brackets_stay_entities() {
        let rendered = render(record("a < b and c > d")).unwrap();
        assert_eq!(rendered.content_text, "a &lt; b and c &gt; d");
    }

    #[test]
    fn test_unclosed_fence_fails() {
        let err = render(record("intro\n\n```rust\nfn main() {}\n")).unwrap_err();
        assert_eq!(err, RenderError::UnclosedFence { line: 3 });
    }

    #[test]
    fn test_closed_fences_render() {
        let body = "```rust\nfn main() {}\n```\n\n~~~~\nraw\n~~~~\n";
        let rendered = render(record(body)).unwrap();
        assert!(rendered.content_display.contains("<code"));
    }

    #[test]
    fn test_shorter_closing_fence_does_not_close() {
        let err = render(record("````\ncode\n```\n")).unwrap_err();
        assert_eq!(err, RenderError::UnclosedFence { line: 1 });
    }

    #[test]
    fn test_inline_triple_backticks_are_not_a_fence() {
        let rendered = render(record("```inline``` code\n\nmore")).unwrap();
        assert!(rendered.content_text.contains("more"));
    }

    #[test]
    fn test_indented_code_with_backticks_renders() {
        let body = "Example:\n\n    ```\n    not a fence\n\nAfter.\n";
        let rendered = render(record(body)).unwrap();
        assert_eq!(
            rendered.content_display,
            "<p>Example:</p>\n<pre><code>```\nnot a fence\n</code></pre>\n<p>After.</p>\n"
        );
    }

    #[test]
    fn test_deeply_indented_fence_line_is_content() {
        let rendered = render(record("```md\n    ```\n```\n")).unwrap();
        assert!(rendered.content_display.contains("<pre><code class=\"language-md\">    ```"));
    }

    #[test]
    fn test_deeply_indented_closer_does_not_close() {
        let err = render(record("```md\ncode\n    ```\n")).unwrap_err();
        assert_eq!(err, RenderError::UnclosedFence { line: 1 });
    }

    #[test]
    fn test_fence_inside_containers() {
        assert!(render(record("> ```\n> quoted\n> ```\n")).is_ok());
        assert!(render(record("- item\n\n  ```\n  code\n  ```\n")).is_ok());

        let err = render(record("intro\n\n> ```\n> quoted\n\nafter\n")).unwrap_err();
        assert_eq!(err, RenderError::UnclosedFence { line: 3 });
    }

    #[test]
    fn test_nul_fails() {
        let err = render(record("ab\0c")).unwrap_err();
        assert_eq!(err, RenderError::NulCharacter { offset: 2 });
    }

    #[test]
    fn test_render_all_partial_failure() {
        let mut bad = record("```\nnever closed");
        bad.source_id = "bad.md".to_string();
        let report = render_all(vec![record("fine"), bad]);
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_id, "bad.md");
    }
}
