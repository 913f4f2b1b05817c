use anyhow::Result;
use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{empty_schema, reload_annotations, respond, NameParams, Tool};
use crate::content::PromptRegistry;

/// スキル一覧ツール
pub struct ListSkillsTool {
    registry: Arc<PromptRegistry>,
}

impl ListSkillsTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for ListSkillsTool {
    fn name(&self) -> &str {
        "skills_list_skills"
    }

    fn title(&self) -> &str {
        "List Skills"
    }

    fn description(&self) -> &str {
        "List all available skills loaded from the skills directory.\n\n\
         Returns each skill's name, description, and trigger keywords: \
         { \"skills\": [{ \"name\", \"description\", \"triggers\" }], \"count\" }"
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _params: Value) -> Result<CallToolResult> {
        respond(self.registry.list_skills().await)
    }
}

/// スキル取得ツール
pub struct GetSkillTool {
    registry: Arc<PromptRegistry>,
}

impl GetSkillTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for GetSkillTool {
    fn name(&self) -> &str {
        "skills_get_skill"
    }

    fn title(&self) -> &str {
        "Get Skill"
    }

    fn description(&self) -> &str {
        "Retrieve the full content of a specific skill by name.\n\n\
         Returns: { \"name\", \"description\", \"triggers\", \"content\" }\n\n\
         Errors: returns an error listing the available skills if the name is not found."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Skill name (without .md extension, e.g. \"docx\")"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<CallToolResult> {
        let params = NameParams::parse(params)?;
        respond(self.registry.get_skill(&params.name).await)
    }
}

/// スキル再読み込みツール
pub struct ReloadSkillsTool {
    registry: Arc<PromptRegistry>,
}

impl ReloadSkillsTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for ReloadSkillsTool {
    fn name(&self) -> &str {
        "skills_reload_skills"
    }

    fn title(&self) -> &str {
        "Reload Skills"
    }

    fn description(&self) -> &str {
        "Reload all skills from the skills directory on disk. Use this after adding, editing, \
         or removing .md skill files; no server restart needed.\n\n\
         Returns the updated list of skills after reload."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    fn annotations(&self) -> ToolAnnotations {
        reload_annotations()
    }

    async fn execute(&self, _params: Value) -> Result<CallToolResult> {
        respond(self.registry.reload_skills().await)
    }
}
