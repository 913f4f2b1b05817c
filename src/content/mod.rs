//! テンプレート/スキルの読み込み・解析・レンダリング
//!
//! どちらもディレクトリ内のMarkdownファイルから毎回読み直す。
//! キャッシュは持たないため、外部でファイルを編集しても次の呼び出しで反映される。

pub mod loader;
pub mod metadata;
pub mod placeholder;
pub mod registry;
pub mod skill;
pub mod template;

use std::fmt;

pub use loader::{load_all, load_file};
pub use metadata::{parse_header, HeaderDialect, Metadata, ParsedContent};
pub use registry::{
    Catalog, PromptRegistry, RenderOutput, SkillList, SkillReload, TemplateList, TemplateReload,
};
pub use skill::{Skill, SkillSummary};
pub use template::{PromptTemplate, TemplateSummary};

/// 対象となるファイル拡張子
pub const ARTIFACT_EXTENSION: &str = "md";

/// 成果物の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Template,
    Skill,
}

impl ArtifactKind {
    /// 単数形（ログ用）
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Skill => "skill",
        }
    }

    /// 複数形
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Template => "templates",
            Self::Skill => "skills",
        }
    }

    /// メタデータに説明がないときの既定値
    pub fn default_description(&self, name: &str) -> String {
        match self {
            Self::Template => format!("Prompt template: {}", name),
            Self::Skill => format!("Skill: {}", name),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => write!(f, "Template"),
            Self::Skill => write!(f, "Skill"),
        }
    }
}

/// ディレクトリから読み込まれる成果物
pub trait Artifact: Sized + Send {
    /// 種類
    const KIND: ArtifactKind;

    /// 試すヘッダー書式（優先順）
    const DIALECTS: &'static [HeaderDialect];

    /// ファイル名とヘッダー解析結果から組み立てる
    fn from_parsed(name: String, parsed: ParsedContent) -> Self;

    /// 検索キー
    fn name(&self) -> &str;
}
