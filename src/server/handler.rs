//! MCPサーバーハンドラー
//!
//! プロトコル処理（初期化・バージョン交渉・通知）は `rmcp` に任せ、
//! ここでは `tools/list` と `tools/call` をツールレジストリにつなぐだけ。

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::tools::{is_failure, ToolRegistry};

const INSTRUCTIONS: &str = "Prompt templates and skills served from local directories. \
    Use prompts_list_templates / skills_list_skills to discover what is available, \
    then prompts_render_template or skills_get_skill to fetch content.";

#[derive(Clone)]
pub struct PromptsServer {
    tools: Arc<ToolRegistry>,
}

impl PromptsServer {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }
}

impl ServerHandler for PromptsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::SERVER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools.definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = Value::Object(request.arguments.unwrap_or_else(JsonObject::new));
        let Some(result) = self.tools.call(&request.name, arguments).await else {
            return Err(ErrorData::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ));
        };

        debug!("Tool '{}' finished (error: {})", request.name, is_failure(&result));
        Ok(result)
    }
}
