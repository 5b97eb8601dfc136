use rmcp::schemars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::browser::SdkBrowser;
use crate::classes::outputs::{
    ClassSummary, ClassesErrorOutput, GetClassOutput, ListClassesOutput, PaginationInfo,
    ReloadOutput, ResolveTypeOutput,
};
use crate::sdk::{ClassDetails, TypeTarget, query::resolve_type};
use crate::search::{config::QUICK_SEARCH_LIMIT, quick_search};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListClassesParams {
    #[schemars(description = "Optional case-insensitive substring filter on class names")]
    pub filter: Option<String>,
    #[schemars(description = "Maximum number of classes to return (default: 100)")]
    pub limit: Option<usize>,
    #[schemars(description = "Starting position for pagination (default: 0)")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetClassParams {
    #[schemars(description = "Exact class name, e.g. 'Pawn' or 'Offsets and Globals'")]
    pub class_name: String,
    #[schemars(
        description = "Optional case-insensitive filter on member type, name, offset or size"
    )]
    pub member_filter: Option<String>,
    #[schemars(description = "Optional member name to locate within the layout")]
    pub member_name: Option<String>,
    #[schemars(description = "Optional member offset to locate within the layout")]
    pub member_offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ResolveTypeParams {
    #[schemars(
        description = "A member's type name as shown in a class layout, e.g. 'USceneComponent*' or 'TArray<AActor*>'"
    )]
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub struct ClassTools {
    browser: SdkBrowser,
}

impl ClassTools {
    pub fn new(browser: SdkBrowser) -> Self {
        Self { browser }
    }

    pub async fn list_classes(
        &self,
        params: ListClassesParams,
    ) -> Result<ListClassesOutput, ClassesErrorOutput> {
        let snapshot = self.browser.snapshot().await;
        let names = snapshot
            .class_filter()
            .filter(params.filter.as_deref().unwrap_or_default());

        let total = names.len();
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0);
        if limit == 0 {
            return Err(ClassesErrorOutput::new("Limit must be greater than 0"));
        }

        let classes = names
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|name| snapshot.dataset().get(name))
            .map(|class| {
                let details = ClassDetails::from_record(class);
                ClassSummary {
                    name: details.name,
                    type_tag: details.type_tag,
                    parent: details.parent,
                    size_hex: details.size_hex,
                    member_count: details.member_count,
                }
            })
            .collect();

        Ok(ListClassesOutput {
            classes,
            pagination: PaginationInfo {
                total,
                limit,
                offset,
                has_more: offset.saturating_add(limit) < total,
            },
        })
    }

    pub async fn get_class(
        &self,
        params: GetClassParams,
    ) -> Result<GetClassOutput, ClassesErrorOutput> {
        let snapshot = self.browser.snapshot().await;
        let Some(mut class) = snapshot.class_details(&params.class_name) else {
            return Err(ClassesErrorOutput::new(format!(
                "Class '{}' not found",
                params.class_name
            )));
        };

        let located_row = match (&params.member_name, &params.member_offset) {
            (None, None) => None,
            (name, offset) => class.locate_member(
                name.as_deref().unwrap_or_default(),
                offset.as_deref().unwrap_or_default(),
            ),
        };

        if let Some(filter) = params.member_filter.as_deref() {
            class.members = class.filter_members(filter).into_iter().cloned().collect();
        }

        Ok(GetClassOutput { class, located_row })
    }

    /// Follow a member's type: nothing for basic types, the class when the
    /// dump has it, otherwise quick-search hits for the cleaned name
    pub async fn resolve_type(
        &self,
        params: ResolveTypeParams,
    ) -> Result<ResolveTypeOutput, ClassesErrorOutput> {
        let snapshot = self.browser.snapshot().await;
        let resolution = resolve_type(snapshot.dataset(), &params.type_name);
        let hits = match &resolution {
            TypeTarget::Search(cleaned) => {
                quick_search(snapshot.index(), cleaned, QUICK_SEARCH_LIMIT)
            }
            TypeTarget::Basic | TypeTarget::Class(_) => Vec::new(),
        };

        Ok(ResolveTypeOutput {
            type_name: params.type_name,
            resolution,
            hits,
        })
    }

    pub async fn reload_sdk(&self) -> Result<ReloadOutput, ClassesErrorOutput> {
        match self.browser.reload().await {
            Ok(snapshot) => Ok(ReloadOutput {
                source: self.browser.source().unwrap_or_default(),
                classes: snapshot.dataset().len(),
                members: snapshot.index().members().len(),
                loaded_at: snapshot.loaded_at(),
            }),
            Err(e) => Err(ClassesErrorOutput::new(format!(
                "Failed to reload SDK data: {e:#}"
            ))),
        }
    }
}
