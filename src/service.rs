use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::browser::SdkBrowser;
use crate::classes::{
    ClassTools,
    tools::{GetClassParams, ListClassesParams, ResolveTypeParams},
};
use crate::search::{
    SearchTools,
    tools::{QuickSearchParams, SearchSdkParams},
};

#[derive(Debug, Clone)]
pub struct SdkBrowserService {
    class_tools: ClassTools,
    search_tools: SearchTools,
    tool_router: ToolRouter<Self>,
}

impl SdkBrowserService {
    pub fn new(browser: SdkBrowser) -> Self {
        Self {
            class_tools: ClassTools::new(browser.clone()),
            search_tools: SearchTools::new(browser),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl SdkBrowserService {
    // Class tools
    #[tool(
        description = "List classes in the loaded SDK dump, sorted by name. Use to browse the dump or to find exact class names. Supports an optional case-insensitive substring filter and pagination."
    )]
    pub async fn list_classes(&self, params: Parameters<ListClassesParams>) -> String {
        match self.class_tools.list_classes(params.0).await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }

    #[tool(
        description = "Get a class's layout: inheritance, size, and every member with its type, offset and size. Use after finding a class with search_sdk or list_classes. Optionally filter member rows, or locate a member by name or offset."
    )]
    pub async fn get_class(&self, params: Parameters<GetClassParams>) -> String {
        match self.class_tools.get_class(params.0).await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }

    #[tool(
        description = "Follow a member's type to its class. Pointer and template punctuation is stripped; basic types resolve to nothing, known classes resolve to the class, and anything else returns quick-search hits for the cleaned name."
    )]
    pub async fn resolve_type(&self, params: Parameters<ResolveTypeParams>) -> String {
        match self.class_tools.resolve_type(params.0).await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }

    #[tool(
        description = "Re-read the SDK data and globals from their sources, bypassing the cache, and replace the loaded dump. Use when the dump on disk or at the URL has changed."
    )]
    pub async fn reload_sdk(&self) -> String {
        match self.class_tools.reload_sdk().await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }

    // Search tools
    #[tool(
        description = "Ranked search across all classes and members. Scores exact, prefix and substring matches on names, and hex offsets with or without the 0x prefix; adds typo-tolerant matches when few results are found. Set type_mode to search members by type instead. Returns up to 250 results with highlighted fields."
    )]
    pub async fn search_sdk(&self, params: Parameters<SearchSdkParams>) -> String {
        match self.search_tools.search_sdk(params.0).await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }

    #[tool(
        description = "Fast unranked substring search over class names, member names and member offsets, in dump order. Returns at most 30 hits. Use for quick lookups; use search_sdk for ranked results."
    )]
    pub async fn quick_search(&self, params: Parameters<QuickSearchParams>) -> String {
        match self.search_tools.quick_search(params.0).await {
            Ok(output) => output.to_json(),
            Err(error) => error.to_json(),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SdkBrowserService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation::from_build_env(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "MCP server for browsing a reverse-engineered SDK dump of classes and their member layouts. Use search_sdk to find classes, members or offsets, then get_class to inspect a layout. Use resolve_type to jump from a member's type to its class. list_classes gives the sorted class list; quick_search is a cheap substring lookup. Call reload_sdk after the dump changes.".to_string(),
            ),
            ..Default::default()
        }
    }
}
