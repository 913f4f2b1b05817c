use serde::{Deserialize, Serialize};

use super::metadata::{HeaderDialect, ParsedContent};
use super::{Artifact, ArtifactKind};

/// スキル定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// ファイル名（拡張子なし）
    pub name: String,
    /// 説明
    pub description: String,
    /// トリガーキーワード
    pub triggers: Vec<String>,
    /// スキル本文（Markdown）
    pub content: String,
}

/// 一覧用（本文なし）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
}

impl Skill {
    pub fn summary(&self) -> SkillSummary {
        SkillSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            triggers: self.triggers.clone(),
        }
    }
}

impl Artifact for Skill {
    const KIND: ArtifactKind = ArtifactKind::Skill;
    // frontmatter を優先し、なければコメントヘッダー
    const DIALECTS: &'static [HeaderDialect] =
        &[HeaderDialect::FrontMatter, HeaderDialect::HtmlComment];

    fn from_parsed(name: String, parsed: ParsedContent) -> Self {
        let description = parsed
            .metadata
            .description
            .unwrap_or_else(|| Self::KIND.default_description(&name));

        Self {
            name,
            description,
            triggers: parsed.metadata.triggers.unwrap_or_default(),
            content: parsed.body,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
