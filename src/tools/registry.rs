use rmcp::model::{CallToolResult, Tool as McpTool};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{failure, Tool};

/// ツールレジストリ - ツールの登録と検索
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// 新しいレジストリを作成
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// ツールを登録
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// 名前でツールを取得
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// ツール名一覧を取得（名前順）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// 全ツール定義を取得（名前順）
    pub fn definitions(&self) -> Vec<McpTool> {
        let mut definitions: Vec<McpTool> =
            self.tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// ツールを実行。未登録なら `None`
    ///
    /// 実行中のエラー（引数不正など）は失敗結果に変換する。
    pub async fn call(&self, name: &str, params: Value) -> Option<CallToolResult> {
        let tool = self.get(name)?;
        let result = match tool.execute(params).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Tool '{}' failed: {:#}", name, e);
                failure(format!("{:#}", e))
            }
        };
        Some(result)
    }

    /// ツールが存在するかチェック
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// ツール数を取得
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// 空かチェック
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PromptRegistry;
    use crate::tools::{default_tools, is_failure, result_text};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_default_tools_registered() {
        let dir = tempdir().unwrap();
        let tools = default_tools(Arc::new(PromptRegistry::new(dir.path(), dir.path())));
        assert_eq!(tools.len(), 7);
        assert_eq!(
            tools.names(),
            vec![
                "prompts_get_template",
                "prompts_list_templates",
                "prompts_reload_templates",
                "prompts_render_template",
                "skills_get_skill",
                "skills_list_skills",
                "skills_reload_skills",
            ]
        );
        assert!(tools.contains("prompts_render_template"));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let tools = ToolRegistry::new();
        assert!(tools.call("nope", json!({})).await.is_none());
    }

    #[tokio::test]
    async fn test_call_with_invalid_arguments_is_error_result() {
        let dir = tempdir().unwrap();
        let tools = default_tools(Arc::new(PromptRegistry::new(dir.path(), dir.path())));
        let result = tools
            .call("prompts_get_template", json!({"name": 42}))
            .await
            .unwrap();
        assert!(is_failure(&result));
        assert!(result_text(&result).starts_with("Error: Invalid arguments"));
    }

    #[test]
    fn test_definitions_sorted_with_hints() {
        let dir = tempdir().unwrap();
        let tools = default_tools(Arc::new(PromptRegistry::new(dir.path(), dir.path())));
        let definitions = tools.definitions();
        assert_eq!(definitions[0].name, "prompts_get_template");

        let render = definitions
            .iter()
            .find(|t| t.name == "prompts_render_template")
            .unwrap();
        assert_eq!(render.title.as_deref(), Some("Render Prompt Template"));
        assert_eq!(render.input_schema["required"], json!(["name"]));
        assert_eq!(render.annotations.as_ref().unwrap().read_only_hint, Some(true));
    }
}
