use rmcp::schemars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::browser::SdkBrowser;
use crate::search::{
    config::{MAX_RESULTS, QUICK_SEARCH_LIMIT},
    engine::SearchQuery,
    highlight::render_result,
    outputs::{QuickSearchOutput, SearchErrorOutput, SearchHit, SearchSdkOutput},
    quick::quick_search,
};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchSdkParams {
    #[schemars(
        description = "Text to search for. Matches class names, member names and hex offsets (with or without 0x); falls back to typo-tolerant matching when few results are found"
    )]
    pub query: String,
    #[schemars(description = "Include classes in the results (default: true)")]
    pub include_classes: Option<bool>,
    #[schemars(description = "Include members in the results (default: true)")]
    pub include_members: Option<bool>,
    #[schemars(
        description = "Match members by their type name instead of name and offset (default: false)"
    )]
    pub type_mode: Option<bool>,
    #[schemars(description = "Maximum number of results to return (default: 250, max: 250)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuickSearchParams {
    #[schemars(description = "Case-insensitive substring to look for in class names, member names and offsets")]
    pub query: String,
    #[schemars(description = "Maximum number of hits to return (default: 30, max: 30)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchTools {
    browser: SdkBrowser,
}

impl SearchTools {
    pub fn new(browser: SdkBrowser) -> Self {
        Self { browser }
    }

    /// Ranked search across classes and members
    pub async fn search_sdk(
        &self,
        params: SearchSdkParams,
    ) -> Result<SearchSdkOutput, SearchErrorOutput> {
        let limit = params.limit.unwrap_or(MAX_RESULTS);
        if limit == 0 || limit > MAX_RESULTS {
            return Err(SearchErrorOutput::new(format!(
                "Limit must be between 1 and {MAX_RESULTS}"
            )));
        }

        let query = SearchQuery {
            text: params.query,
            include_classes: params.include_classes.unwrap_or(true),
            include_members: params.include_members.unwrap_or(true),
            type_mode: params.type_mode.unwrap_or(false),
        };
        if !query.include_classes && !query.include_members {
            return Err(SearchErrorOutput::new(
                "At least one of include_classes or include_members must be enabled",
            ));
        }

        let snapshot = self.browser.snapshot().await;
        let outcome = self.browser.engine().search(snapshot.index(), &query);

        let results = outcome
            .results
            .iter()
            .take(limit)
            .map(|result| SearchHit {
                rendered: render_result(result, &outcome.query),
                result: result.clone(),
            })
            .collect();

        Ok(SearchSdkOutput {
            status: outcome.status(),
            total_results: outcome.results.len(),
            elapsed_ms: outcome.elapsed_ms(),
            query: outcome.query,
            results,
        })
    }

    /// Unranked substring search in dataset order, as the top search bar does
    pub async fn quick_search(
        &self,
        params: QuickSearchParams,
    ) -> Result<QuickSearchOutput, SearchErrorOutput> {
        let limit = params.limit.unwrap_or(QUICK_SEARCH_LIMIT);
        if limit == 0 || limit > QUICK_SEARCH_LIMIT {
            return Err(SearchErrorOutput::new(format!(
                "Limit must be between 1 and {QUICK_SEARCH_LIMIT}"
            )));
        }

        let snapshot = self.browser.snapshot().await;
        let hits = quick_search(snapshot.index(), &params.query, limit);
        Ok(QuickSearchOutput {
            query: params.query,
            hits,
        })
    }
}
