pub mod registry;
pub mod skills;
pub mod templates;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool as McpTool, ToolAnnotations};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::content::PromptRegistry;

/// 出力をJSON化し、テキストと構造化データの両方に載せる
pub fn success<T: Serialize>(output: &T) -> Result<CallToolResult> {
    let structured = serde_json::to_value(output)?;
    let text = serde_json::to_string_pretty(&structured)?;
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(structured);
    Ok(result)
}

pub fn failure(error: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", error))])
}

/// 先頭のテキスト
pub fn result_text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|content| content.raw.as_text())
        .map(|text| text.text.as_str())
        .unwrap_or_default()
}

/// 失敗結果かどうか
pub fn is_failure(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// 読み取り専用ツールのヒント
pub fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(false),
        ..Default::default()
    }
}

/// 再読み込み系（状態は変えないが読み取り専用扱いにしない）
pub fn reload_annotations() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(false),
        ..read_only_annotations()
    }
}

/// ツールトレイト - 全ツールが実装する必要がある
#[async_trait]
pub trait Tool: Send + Sync {
    /// ツール名を取得
    fn name(&self) -> &str;

    /// 表示名を取得
    fn title(&self) -> &str;

    /// ツールの説明を取得
    fn description(&self) -> &str;

    /// パラメータスキーマを取得（JSON Schema）
    fn parameters_schema(&self) -> Value;

    fn annotations(&self) -> ToolAnnotations {
        read_only_annotations()
    }

    /// ツールを実行
    async fn execute(&self, params: Value) -> Result<CallToolResult>;

    /// ツール定義を取得（`tools/list` の要素）
    fn definition(&self) -> McpTool {
        let input_schema = match self.parameters_schema() {
            Value::Object(schema) => schema,
            _ => JsonObject::new(),
        };
        let mut tool = McpTool::new(
            self.name().to_string(),
            self.description().to_string(),
            Arc::new(input_schema),
        );
        tool.title = Some(self.title().to_string());
        tool.annotations = Some(self.annotations());
        tool
    }
}

/// 引数なしツールのスキーマ
fn empty_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {}
    })
}

/// 引数をデシリアライズ
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).context("Invalid arguments")
}

/// `name` 引数は空文字を許さない
fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Invalid arguments: name must not be empty");
    }
    Ok(())
}

/// `name` だけを受け取るツールの引数
#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

impl NameParams {
    fn parse(params: Value) -> Result<Self> {
        let params: Self = parse_params(params)?;
        require_name(&params.name)?;
        Ok(params)
    }
}

/// レジストリ操作の結果をツール結果に変換
///
/// not-found などのレジストリエラーはツールの失敗として返す。
fn respond<T: Serialize>(result: crate::error::Result<T>) -> Result<CallToolResult> {
    match result {
        Ok(output) => success(&output),
        Err(e) => {
            tracing::debug!("Tool failed: {}", e);
            Ok(failure(e))
        }
    }
}

/// 全ツールを登録したレジストリを作成
pub fn default_tools(registry: Arc<PromptRegistry>) -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(templates::ListTemplatesTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(templates::GetTemplateTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(templates::RenderTemplateTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(templates::ReloadTemplatesTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(skills::ListSkillsTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(skills::GetSkillTool::new(Arc::clone(&registry))));
    tools.register(Arc::new(skills::ReloadSkillsTool::new(registry)));
    tools
}

pub use registry::ToolRegistry;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_result_shape() {
        let result = success(&json!({"count": 0})).unwrap();
        assert!(!is_failure(&result));
        assert_eq!(result_text(&result), "{\n  \"count\": 0\n}");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["structuredContent"], json!({"count": 0}));
        assert_eq!(value["content"][0]["type"], "text");
    }

    #[test]
    fn test_failure_result_shape() {
        let result = failure("boom");
        assert!(is_failure(&result));
        assert_eq!(result_text(&result), "Error: boom");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isError"], true);
        assert!(value.get("structuredContent").is_none());
    }

    #[test]
    fn test_require_name() {
        assert!(require_name("x").is_ok());
        let err = require_name("").unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: name must not be empty");
    }

    #[test]
    fn test_name_params_validation() {
        assert_eq!(NameParams::parse(json!({"name": "x"})).unwrap().name, "x");
        assert!(NameParams::parse(json!({"name": ""})).is_err());
        assert!(NameParams::parse(json!({})).is_err());
        assert!(NameParams::parse(Value::Null).is_err());
    }

    #[test]
    fn test_reload_annotations() {
        let annotations = reload_annotations();
        assert_eq!(annotations.read_only_hint, Some(false));
        assert_eq!(annotations.idempotent_hint, Some(true));
        assert_eq!(annotations.destructive_hint, Some(false));
        assert_eq!(read_only_annotations().read_only_hint, Some(true));
    }
}
