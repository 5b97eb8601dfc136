use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::search::config::SearchConfig;
use crate::search::fuzzy::{class_fuzzy_score, fuzzy_distance, member_fuzzy_score};
use crate::search::index::SearchIndex;
use crate::search::scorer::{MatchedField, score_member, score_text};

/// Query text plus the advanced search filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub include_classes: bool,
    pub include_members: bool,
    /// Match members on their type instead of name/offset
    pub type_mode: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            include_classes: true,
            include_members: true,
            type_mode: false,
        }
    }
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn classes_only(mut self) -> Self {
        self.include_classes = true;
        self.include_members = false;
        self
    }

    pub fn members_only(mut self) -> Self {
        self.include_classes = false;
        self.include_members = true;
        self
    }

    pub fn with_type_mode(mut self, type_mode: bool) -> Self {
        self.type_mode = type_mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMatch {
    pub name: String,
    pub score: u32,
    pub is_fuzzy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMatch {
    pub class_name: String,
    pub name: String,
    pub type_name: String,
    pub offset: String,
    pub score: u32,
    pub matched_field: MatchedField,
    pub is_fuzzy: bool,
}

/// One ranked hit from the advanced search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Class(ClassMatch),
    Member(MemberMatch),
}

impl SearchResult {
    pub fn score(&self) -> u32 {
        match self {
            SearchResult::Class(m) => m.score,
            SearchResult::Member(m) => m.score,
        }
    }

    pub fn is_fuzzy(&self) -> bool {
        match self {
            SearchResult::Class(m) => m.is_fuzzy,
            SearchResult::Member(m) => m.is_fuzzy,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, SearchResult::Class(_))
    }

    /// The class to select when this result is activated
    pub fn class_name(&self) -> &str {
        match self {
            SearchResult::Class(m) => &m.name,
            SearchResult::Member(m) => &m.class_name,
        }
    }
}

/// Ranked results of one search invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// The trimmed query the results were computed for
    pub query: String,
    pub results: Vec<SearchResult>,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Footer text: a prompt for an empty query, otherwise the result count
    /// and query time
    pub fn status(&self) -> String {
        if self.query.is_empty() {
            return "Enter a search term".to_string();
        }
        let count = self.results.len();
        let plural = if count == 1 { "" } else { "s" };
        format!("{count} result{plural} in {:.1}ms", self.elapsed_ms())
    }
}

/// Order by score descending, classes before members on equal scores, scan
/// order otherwise. `sort_by` is stable, so the last rule needs no key.
pub fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.is_class().cmp(&a.is_class()))
    });
}

/// Runs ranked searches over a [`SearchIndex`]. Holds no index state, so one
/// engine can serve any number of search surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search(&self, index: &SearchIndex, query: &SearchQuery) -> SearchOutcome {
        let start = Instant::now();

        let trimmed = query.text.trim();
        if trimmed.is_empty() {
            return SearchOutcome {
                query: String::new(),
                results: Vec::new(),
                elapsed: start.elapsed(),
            };
        }
        let needle = trimmed.to_lowercase();

        let mut results = Vec::new();
        let mut matched_classes = HashSet::new();
        let mut matched_members = HashSet::new();

        if query.include_classes {
            for class in index.classes() {
                let score = score_text(class.lower_name(), &needle);
                if score > 0 {
                    matched_classes.insert(class.name());
                    results.push(SearchResult::Class(ClassMatch {
                        name: class.name().to_string(),
                        score,
                        is_fuzzy: false,
                    }));
                }
            }
        }

        if query.include_members {
            for member in index.members() {
                if let Some((score, matched_field)) =
                    score_member(member, &needle, query.type_mode)
                {
                    matched_members.insert((member.class_name(), member.name()));
                    results.push(SearchResult::Member(MemberMatch {
                        class_name: member.class_name().to_string(),
                        name: member.name().to_string(),
                        type_name: member.type_name().to_string(),
                        offset: member.offset().to_string(),
                        score,
                        matched_field,
                        is_fuzzy: false,
                    }));
                }
            }
        }

        if results.len() < self.config.fuzzy_threshold {
            if query.include_classes {
                for class in index.classes() {
                    if matched_classes.contains(class.name()) {
                        continue;
                    }
                    if let Some(distance) = fuzzy_distance(class.lower_name(), &needle) {
                        results.push(SearchResult::Class(ClassMatch {
                            name: class.name().to_string(),
                            score: class_fuzzy_score(distance),
                            is_fuzzy: true,
                        }));
                    }
                }
            }

            if query.include_members && !query.type_mode {
                for member in index.members() {
                    if matched_members.contains(&(member.class_name(), member.name())) {
                        continue;
                    }
                    if let Some(distance) = fuzzy_distance(member.lower_name(), &needle) {
                        results.push(SearchResult::Member(MemberMatch {
                            class_name: member.class_name().to_string(),
                            name: member.name().to_string(),
                            type_name: member.type_name().to_string(),
                            offset: member.offset().to_string(),
                            score: member_fuzzy_score(distance),
                            matched_field: MatchedField::Name,
                            is_fuzzy: true,
                        }));
                    }
                }
            }
        }

        sort_results(&mut results);
        results.truncate(self.config.max_results);

        let outcome = SearchOutcome {
            query: trimmed.to_string(),
            results,
            elapsed: start.elapsed(),
        };
        tracing::debug!("Search for '{}': {}", outcome.query, outcome.status());
        outcome
    }
}

/// Search with the default limits
pub fn search(index: &SearchIndex, query: &SearchQuery) -> SearchOutcome {
    SearchEngine::default().search(index, query)
}
