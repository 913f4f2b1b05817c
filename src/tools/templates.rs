use anyhow::Result;
use async_trait::async_trait;
use rmcp::model::{CallToolResult, ToolAnnotations};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    empty_schema, parse_params, reload_annotations, require_name, respond, NameParams, Tool,
};
use crate::content::PromptRegistry;

/// テンプレート一覧ツール
pub struct ListTemplatesTool {
    registry: Arc<PromptRegistry>,
}

impl ListTemplatesTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for ListTemplatesTool {
    fn name(&self) -> &str {
        "prompts_list_templates"
    }

    fn title(&self) -> &str {
        "List Prompt Templates"
    }

    fn description(&self) -> &str {
        "List all available prompt templates loaded from the templates directory.\n\n\
         Returns each template's name, description, and the variable placeholders it accepts \
         (e.g. {{name}}, {{context}}). Use this tool first to discover what templates are \
         available before calling prompts_render_template.\n\n\
         Returns: { \"templates\": [{ \"name\", \"description\", \"variables\" }], \"count\" }"
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _params: Value) -> Result<CallToolResult> {
        respond(self.registry.list_templates().await)
    }
}

/// テンプレート取得ツール（レンダリングなし）
pub struct GetTemplateTool {
    registry: Arc<PromptRegistry>,
}

impl GetTemplateTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for GetTemplateTool {
    fn name(&self) -> &str {
        "prompts_get_template"
    }

    fn title(&self) -> &str {
        "Get Prompt Template"
    }

    fn description(&self) -> &str {
        "Retrieve the raw markdown content of a specific prompt template by name, with its \
         {{variable}} placeholders still intact.\n\n\
         Returns: { \"name\", \"description\", \"variables\", \"content\" }\n\n\
         Errors: returns an error listing the available templates if the name is not found."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Template name (without .md extension, e.g. \"code-review\")"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<CallToolResult> {
        let params = NameParams::parse(params)?;
        respond(self.registry.get_template(&params.name).await)
    }
}

#[derive(Debug, Deserialize)]
struct RenderParams {
    name: String,
    #[serde(default)]
    variables: HashMap<String, String>,
}

/// テンプレートレンダリングツール
pub struct RenderTemplateTool {
    registry: Arc<PromptRegistry>,
}

impl RenderTemplateTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for RenderTemplateTool {
    fn name(&self) -> &str {
        "prompts_render_template"
    }

    fn title(&self) -> &str {
        "Render Prompt Template"
    }

    fn description(&self) -> &str {
        "Render a prompt template by substituting {{variable}} placeholders with provided values. \
         Any {{variable}} not provided remains as-is in the output.\n\n\
         Returns: { \"name\", \"rendered\", \"unresolved\" } where unresolved lists the template \
         variables that were not provided.\n\n\
         Errors: returns an error listing the available templates if the name is not found."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Template name (without .md extension)"
                },
                "variables": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "default": {},
                    "description": "Variable values to substitute into the template"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<CallToolResult> {
        let params: RenderParams = parse_params(params)?;
        require_name(&params.name)?;
        respond(
            self.registry
                .render_template(&params.name, &params.variables)
                .await,
        )
    }
}

/// テンプレート再読み込みツール
pub struct ReloadTemplatesTool {
    registry: Arc<PromptRegistry>,
}

impl ReloadTemplatesTool {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Tool for ReloadTemplatesTool {
    fn name(&self) -> &str {
        "prompts_reload_templates"
    }

    fn title(&self) -> &str {
        "Reload Templates"
    }

    fn description(&self) -> &str {
        "Reload all prompt templates from the templates directory on disk. Use this after \
         adding, editing, or removing .md template files; no server restart needed.\n\n\
         Returns the updated list of templates after reload."
    }

    fn parameters_schema(&self) -> Value {
        empty_schema()
    }

    fn annotations(&self) -> ToolAnnotations {
        reload_annotations()
    }

    async fn execute(&self, _params: Value) -> Result<CallToolResult> {
        respond(self.registry.reload_templates().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{is_failure, result_text};
    use tempfile::{tempdir, TempDir};

    fn registry() -> (TempDir, Arc<PromptRegistry>) {
        let root = tempdir().unwrap();
        let templates = root.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("code-review.md"),
            "<!-- description: Review code -->\nReview this {{language}} code:\n{{code}}",
        )
        .unwrap();
        let registry = Arc::new(PromptRegistry::new(templates, root.path().join("skills")));
        (root, registry)
    }

    #[tokio::test]
    async fn test_list_templates_tool() {
        let (_root, registry) = registry();
        let result = ListTemplatesTool::new(registry).execute(json!({})).await.unwrap();
        assert!(!is_failure(&result));
        assert_eq!(
            result.structured_content,
            Some(json!({
                "templates": [{
                    "name": "code-review",
                    "description": "Review code",
                    "variables": ["language", "code"]
                }],
                "count": 1
            }))
        );
        assert!(result_text(&result).contains("\"code-review\""));
    }

    #[tokio::test]
    async fn test_get_template_tool_not_found() {
        let (_root, registry) = registry();
        let result = GetTemplateTool::new(registry)
            .execute(json!({"name": "missing"}))
            .await
            .unwrap();
        assert!(is_failure(&result));
        assert_eq!(
            result_text(&result),
            "Error: Template \"missing\" not found. Available templates: code-review"
        );
    }

    #[tokio::test]
    async fn test_render_template_tool() {
        let (_root, registry) = registry();
        let result = RenderTemplateTool::new(registry)
            .execute(json!({"name": "code-review", "variables": {"language": "TypeScript"}}))
            .await
            .unwrap();
        assert_eq!(
            result.structured_content,
            Some(json!({
                "name": "code-review",
                "rendered": "Review this TypeScript code:\n{{code}}",
                "unresolved": ["code"]
            }))
        );
    }

    #[tokio::test]
    async fn test_render_template_tool_defaults_variables() {
        let (_root, registry) = registry();
        let result = RenderTemplateTool::new(registry)
            .execute(json!({"name": "code-review"}))
            .await
            .unwrap();
        let output = result.structured_content.unwrap();
        assert_eq!(output["unresolved"], json!(["language", "code"]));
    }

    #[tokio::test]
    async fn test_render_template_tool_rejects_non_string_values() {
        let (_root, registry) = registry();
        let result = RenderTemplateTool::new(registry)
            .execute(json!({"name": "code-review", "variables": {"language": 3}}))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_render_template_tool_rejects_empty_name() {
        let (_root, registry) = registry();
        let err = RenderTemplateTool::new(registry)
            .execute(json!({"name": ""}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: name must not be empty");
    }

    #[tokio::test]
    async fn test_reload_templates_tool() {
        let (_root, registry) = registry();
        let tool = ReloadTemplatesTool::new(registry);
        assert_eq!(
            tool.definition().annotations.and_then(|a| a.read_only_hint),
            Some(false)
        );

        let result = tool.execute(json!({})).await.unwrap();
        let output = result.structured_content.unwrap();
        assert_eq!(output["count"], 1);
        assert!(output["message"]
            .as_str()
            .unwrap()
            .starts_with("Reloaded 1 templates from "));
    }
}
