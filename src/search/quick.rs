//! The two lightweight search surfaces: the sidebar class filter and the
//! global quick-search dropdown. Both use plain substring matching with no
//! ranking.

use serde::{Deserialize, Serialize};

use crate::search::highlight::HighlightSpan;
use crate::search::index::SearchIndex;

/// Sorted class names with their lower-cased forms, filtered by substring
#[derive(Debug, Clone, Default)]
pub struct ClassFilter {
    entries: Vec<(String, String)>,
}

impl ClassFilter {
    pub fn new(index: &SearchIndex) -> Self {
        let mut entries: Vec<(String, String)> = index
            .classes()
            .iter()
            .map(|c| (c.name().to_string(), c.lower_name().to_string()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Class names containing `query`, case-insensitively, in sorted order.
    /// An empty query returns every class.
    pub fn filter(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(_, lower)| query.is_empty() || lower.contains(&query))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Which member field a dropdown hit matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickField {
    Name,
    Offset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuickHit {
    Class {
        class_name: String,
        span: Option<HighlightSpan>,
    },
    Member {
        class_name: String,
        name: String,
        type_name: String,
        offset: String,
        matched: QuickField,
        span: Option<HighlightSpan>,
    },
}

impl QuickHit {
    pub fn class_name(&self) -> &str {
        match self {
            QuickHit::Class { class_name, .. } | QuickHit::Member { class_name, .. } => class_name,
        }
    }

    /// The text the span points into
    pub fn matched_text(&self) -> &str {
        match self {
            QuickHit::Class { class_name, .. } => class_name,
            QuickHit::Member {
                name,
                offset,
                matched,
                ..
            } => match matched {
                QuickField::Name => name,
                QuickField::Offset => offset,
            },
        }
    }

    pub fn span(&self) -> Option<HighlightSpan> {
        match self {
            QuickHit::Class { span, .. } | QuickHit::Member { span, .. } => *span,
        }
    }
}

fn find_span(text: &str, query: &str) -> Option<HighlightSpan> {
    text.to_ascii_lowercase()
        .find(&query.to_ascii_lowercase())
        .map(|start| HighlightSpan::new(start, query.len()))
}

/// Dropdown search in dataset order: each class that contains `query`, then
/// each of its members whose name (or failing that, offset) contains it.
/// Stops after `limit` hits; an empty query yields nothing.
pub fn quick_search(index: &SearchIndex, query: &str, limit: usize) -> Vec<QuickHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let mut hits = Vec::new();

    for class in index.classes() {
        if hits.len() >= limit {
            break;
        }
        if class.lower_name().contains(&needle) {
            hits.push(QuickHit::Class {
                class_name: class.name().to_string(),
                span: find_span(class.name(), query),
            });
        }

        for member in index.members_of(class) {
            let matched = if member.lower_name().contains(&needle) {
                QuickField::Name
            } else if member.lower_offset().contains(&needle) {
                QuickField::Offset
            } else {
                continue;
            };
            let text = match matched {
                QuickField::Name => member.name(),
                QuickField::Offset => member.offset(),
            };
            hits.push(QuickHit::Member {
                class_name: member.class_name().to_string(),
                name: member.name().to_string(),
                type_name: member.type_name().to_string(),
                offset: member.offset().to_string(),
                matched,
                span: find_span(text, query),
            });
        }
    }

    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{ClassRecord, MemberRecord, SdkDataset};

    fn index() -> SearchIndex {
        let dataset: SdkDataset = [
            ClassRecord::new("Zombie").with_member(MemberRecord::new("Health", "int", "0x40", "4")),
            ClassRecord::new("Actor")
                .with_member(MemberRecord::new("RootComponent", "USceneComponent*", "0x130", "8"))
                .with_member(MemberRecord::new("bHidden", "bool", "0x58", "1")),
            ClassRecord::new("HealthComponent"),
        ]
        .into_iter()
        .collect();
        SearchIndex::build(&dataset)
    }

    #[test]
    fn test_class_filter_sorted_substring() {
        let filter = ClassFilter::new(&index());
        assert_eq!(filter.filter(""), vec!["Actor", "HealthComponent", "Zombie"]);
        assert_eq!(filter.filter("OM"), vec!["HealthComponent", "Zombie"]);
        assert!(filter.filter("pawn").is_empty());
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_quick_search_dataset_order() {
        let hits = quick_search(&index(), "health", 30);
        let classes: Vec<_> = hits.iter().map(|h| h.class_name()).collect();
        assert_eq!(classes, vec!["Zombie", "HealthComponent"]);

        match &hits[0] {
            QuickHit::Member { name, matched, span, .. } => {
                assert_eq!(name, "Health");
                assert_eq!(*matched, QuickField::Name);
                assert_eq!(*span, Some(HighlightSpan::new(0, 6)));
            }
            other => panic!("expected member hit, got {other:?}"),
        }
        assert!(matches!(hits[1], QuickHit::Class { .. }));
    }

    #[test]
    fn test_quick_search_offset_fallback() {
        let hits = quick_search(&index(), "0x13", 30);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched_text(), "0x130");
        assert_eq!(hits[0].span(), Some(HighlightSpan::new(0, 4)));
    }

    #[test]
    fn test_quick_search_limit_and_empty() {
        assert!(quick_search(&index(), "", 30).is_empty());

        let dataset: SdkDataset = (0..50)
            .map(|i| ClassRecord::new(format!("Widget{i}")))
            .collect();
        let hits = quick_search(&SearchIndex::build(&dataset), "widget", 30);
        assert_eq!(hits.len(), 30);
        assert_eq!(hits[29].class_name(), "Widget29");
    }
}
