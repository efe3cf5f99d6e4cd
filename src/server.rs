//! MCP server exposing the documentation index as tools.

use crate::state::DocState;
use crate::tools::{
    GetEntryRequest, SearchRequest, SuggestRequest, handle_facets, handle_get_entry,
    handle_search, handle_suggest,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for operator documentation queries
#[derive(Clone)]
pub struct DocServer {
    /// Shared documentation index
    state: Arc<DocState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for DocServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl DocServer {
    pub fn new(state: DocState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared DocState.
    pub fn doc_state(&self) -> &Arc<DocState> {
        &self.state
    }

    #[tool(
        description = "Search operator and API documentation. Every query word must match; results are ranked by relevance with name matches weighted highest. Supports category and tag filters and typo-tolerant fuzzy matching.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search_docs(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Autocomplete a partial query. Returns indexed words and entry names starting with the given prefix (at least 2 characters).",
        input_schema = inline_schema_for_type::<SuggestRequest>()
    )]
    async fn suggest(
        &self,
        Parameters(request): Parameters<SuggestRequest>,
    ) -> std::result::Result<String, String> {
        handle_suggest(&self.state, request).await
    }

    #[tool(
        description = "Summarize the documentation index: entry counts per category, subcategory and tag."
    )]
    async fn facets(&self) -> std::result::Result<String, String> {
        handle_facets(&self.state).await
    }

    #[tool(
        description = "Show the full documentation of one entry (description, usage, parameters, keywords) by the id shown in search results.",
        input_schema = inline_schema_for_type::<GetEntryRequest>()
    )]
    async fn get_entry(
        &self,
        Parameters(request): Parameters<GetEntryRequest>,
    ) -> std::result::Result<String, String> {
        handle_get_entry(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "opdocs-mcp: Operator and API documentation lookup. \
             Use search_docs to find entries, get_entry for full details, \
             suggest to complete partial terms and facets to see what is indexed."
                .to_string(),
        );
        info
    }
}

/// Tool input schema with every subschema inlined.
///
/// MCP clients render `$ref` definitions poorly, so nested types are expanded
/// in place and optional fields are marked nullable.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let generator = SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .with_transform(schemars::transform::AddNullable::default())
        .into_generator();

    let object = match serde_json::to_value(generator.into_root_schema_for::<T>()) {
        Ok(serde_json::Value::Object(object)) => object,
        _ => JsonObject::new(),
    };
    Arc::new(object)
}
