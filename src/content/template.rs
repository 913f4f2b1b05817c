use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::metadata::{HeaderDialect, ParsedContent};
use super::placeholder;
use super::{Artifact, ArtifactKind};

/// プロンプトテンプレート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// ファイル名（拡張子なし）
    pub name: String,
    /// 説明
    pub description: String,
    /// 本文中の `{{variable}}`（出現順）
    pub variables: Vec<String>,
    /// ヘッダーを除いた本文
    pub content: String,
}

/// 一覧用（本文なし）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub variables: Vec<String>,
}

impl PromptTemplate {
    /// 本文をレンダリング
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        placeholder::render(&self.content, values)
    }

    /// `values` で埋まらない変数
    pub fn unresolved(&self, values: &HashMap<String, String>) -> Vec<String> {
        placeholder::unresolved(&self.variables, values)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            variables: self.variables.clone(),
        }
    }
}

impl Artifact for PromptTemplate {
    const KIND: ArtifactKind = ArtifactKind::Template;
    const DIALECTS: &'static [HeaderDialect] = &[HeaderDialect::HtmlComment];

    fn from_parsed(name: String, parsed: ParsedContent) -> Self {
        let description = parsed
            .metadata
            .description
            .unwrap_or_else(|| Self::KIND.default_description(&name));
        let variables = placeholder::extract_variables(&parsed.body);

        Self {
            name,
            description,
            variables,
            content: parsed.body,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
