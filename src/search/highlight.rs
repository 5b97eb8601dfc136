//! Highlight spans and escaped markup for search results.
//!
//! Spans are byte ranges into the original text. Case folding is ASCII only,
//! which keeps byte positions identical between the text and its lower-cased
//! form.

use serde::{Deserialize, Serialize};

use crate::search::engine::SearchResult;
use crate::search::scorer::{MatchedField, strip_hex_prefix};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// A highlighted byte range inside a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub len: usize,
}

impl HighlightSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Split `text` into the parts before, inside and after the span.
    /// Returns `None` if the span does not fall on character boundaries.
    pub fn split<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str, &'a str)> {
        Some((
            text.get(..self.start)?,
            text.get(self.start..self.end())?,
            text.get(self.end()..)?,
        ))
    }
}

/// Locate `query` in `text`, case-insensitively.
pub fn highlight(text: &str, query: &str) -> Option<HighlightSpan> {
    if text.is_empty() || query.is_empty() {
        return None;
    }

    let lower_query = query.to_ascii_lowercase();
    text.to_ascii_lowercase()
        .find(&lower_query)
        .map(|index| HighlightSpan::new(index, lower_query.len()))
}

/// Locate `query` in an offset string.
///
/// A leading `0x` is first stripped from both sides so `ff` finds the digits
/// of `0xFF10`; the span is shifted past the prefix when the text had one.
/// Otherwise this falls back to [`highlight`].
pub fn highlight_offset(text: &str, query: &str) -> Option<HighlightSpan> {
    let lower_text = text.to_ascii_lowercase();
    let lower_query = query.to_ascii_lowercase();

    let clean_text = strip_hex_prefix(&lower_text);
    let clean_query = strip_hex_prefix(&lower_query);
    if !clean_query.is_empty() {
        if let Some(index) = clean_text.find(clean_query) {
            let shift = lower_text.len() - clean_text.len();
            return Some(HighlightSpan::new(index + shift, clean_query.len()));
        }
    }

    highlight(text, query)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap the span in `open`/`close` without escaping, e.g. for ANSI output
pub fn paint(text: &str, span: Option<HighlightSpan>, open: &str, close: &str) -> String {
    match span.and_then(|s| s.split(text)) {
        Some((before, inside, after)) => format!("{before}{open}{inside}{close}{after}"),
        None => text.to_string(),
    }
}

/// HTML-escape `text` and wrap the span in `<mark>`. Each segment is escaped
/// on its own, so the markup never lands inside an entity.
pub fn render_markup(text: &str, span: Option<HighlightSpan>) -> String {
    match span.and_then(|s| s.split(text)) {
        Some((before, inside, after)) => format!(
            "{}{MARK_OPEN}{}{MARK_CLOSE}{}",
            escape_html(before),
            escape_html(inside),
            escape_html(after)
        ),
        None => escape_html(text),
    }
}

/// Escaped, highlighted view of one result, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedResult {
    /// `Class` or `Member`
    pub label: String,
    /// Owning class of a member result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_indicator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

fn match_indicator(field: MatchedField) -> Option<&'static str> {
    match field {
        MatchedField::Offset => Some("(offset match)"),
        MatchedField::Type => Some("(type match)"),
        MatchedField::Name => None,
    }
}

/// Render a result for `query`. Members are highlighted only in the field
/// that produced their score.
pub fn render_result(result: &SearchResult, query: &str) -> RenderedResult {
    let badge = result.is_fuzzy().then(|| "Fuzzy match".to_string());
    match result {
        SearchResult::Class(class) => RenderedResult {
            label: "Class".to_string(),
            class_name: None,
            name: render_markup(&class.name, highlight(&class.name, query)),
            type_name: None,
            offset: None,
            match_indicator: None,
            badge,
        },
        SearchResult::Member(member) => {
            let field_query = |field: MatchedField| {
                if member.matched_field == field { query } else { "" }
            };
            let name_query = field_query(MatchedField::Name);
            let type_query = field_query(MatchedField::Type);
            let offset_query = field_query(MatchedField::Offset);
            RenderedResult {
                label: "Member".to_string(),
                class_name: Some(escape_html(&member.class_name)),
                name: render_markup(&member.name, highlight(&member.name, name_query)),
                type_name: Some(render_markup(
                    &member.type_name,
                    highlight(&member.type_name, type_query),
                )),
                offset: Some(render_markup(
                    &member.offset,
                    highlight_offset(&member.offset, offset_query),
                )),
                match_indicator: match_indicator(member.matched_field).map(str::to_string),
                badge,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::engine::{ClassMatch, MemberMatch};

    #[test]
    fn test_highlight_hex_digits() {
        assert_eq!(highlight_offset("0xFF1000", "ff"), Some(HighlightSpan::new(2, 2)));
        assert_eq!(highlight_offset("0xFF1000", "0x1000"), Some(HighlightSpan::new(4, 4)));
        assert_eq!(highlight_offset("FF1000", "0xff"), Some(HighlightSpan::new(0, 2)));
        assert_eq!(highlight_offset("0x40", "0x"), Some(HighlightSpan::new(0, 2)));
        assert_eq!(highlight_offset("", "40"), None);
    }

    #[test]
    fn test_highlight_plain_text() {
        assert_eq!(highlight("MaxHealth", "health"), Some(HighlightSpan::new(3, 6)));
        assert_eq!(highlight("0xFF1000", "ff"), Some(HighlightSpan::new(2, 2)));
        assert_eq!(highlight("MaxHealth", "armor"), None);
        assert_eq!(highlight("", "a"), None);
        assert_eq!(highlight("abc", ""), None);
        assert_eq!(highlight("Health", "0x"), None);
    }

    #[test]
    fn test_highlight_names_keep_hex_prefix_literal() {
        assert_eq!(highlight("ab0xab", "0xab"), Some(HighlightSpan::new(2, 4)));
        assert_eq!(highlight("abcd", "0xab"), None);
    }

    #[test]
    fn test_markup_does_not_split_entities() {
        let text = "TArray<Actor>";
        let span = highlight(text, "actor");
        assert_eq!(
            render_markup(text, span),
            "TArray&lt;<mark>Actor</mark>&gt;"
        );
        assert_eq!(render_markup("a&b", None), "a&amp;b");
    }

    #[test]
    fn test_paint() {
        let span = highlight("Health", "ea");
        assert_eq!(paint("Health", span, "[", "]"), "H[ea]lth");
        assert_eq!(paint("Health", None, "[", "]"), "Health");
    }

    #[test]
    fn test_render_member_highlights_matched_field() {
        let result = SearchResult::Member(MemberMatch {
            class_name: "Pawn<T>".to_string(),
            name: "Health40".to_string(),
            type_name: "int".to_string(),
            offset: "0x40".to_string(),
            score: 90,
            matched_field: MatchedField::Offset,
            is_fuzzy: false,
        });
        let rendered = render_result(&result, "40");
        assert_eq!(rendered.label, "Member");
        assert_eq!(rendered.class_name.as_deref(), Some("Pawn&lt;T&gt;"));
        assert_eq!(rendered.name, "Health40");
        assert_eq!(rendered.offset.as_deref(), Some("0x<mark>40</mark>"));
        assert_eq!(rendered.match_indicator.as_deref(), Some("(offset match)"));
        assert_eq!(rendered.badge, None);
    }

    #[test]
    fn test_render_name_match_with_hex_like_query() {
        let result = SearchResult::Member(MemberMatch {
            class_name: "Pawn".to_string(),
            name: "ab0xab".to_string(),
            type_name: "int".to_string(),
            offset: "0x10".to_string(),
            score: 50,
            matched_field: MatchedField::Name,
            is_fuzzy: false,
        });
        let rendered = render_result(&result, "0xab");
        assert_eq!(rendered.name, "ab<mark>0xab</mark>");
        assert_eq!(rendered.offset.as_deref(), Some("0x10"));
    }

    #[test]
    fn test_render_fuzzy_class() {
        let result = SearchResult::Class(ClassMatch {
            name: "Pawn".to_string(),
            score: 15,
            is_fuzzy: true,
        });
        let rendered = render_result(&result, "pwn");
        assert_eq!(rendered.label, "Class");
        assert_eq!(rendered.name, "Pawn");
        assert_eq!(rendered.badge.as_deref(), Some("Fuzzy match"));
    }
}
