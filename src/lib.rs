//! prompts-mcp-server: プロンプトテンプレート/スキル配信サーバー
//!
//! ディレクトリ内のMarkdownファイルをテンプレート・スキルとして読み込み、
//! MCPツールとして一覧・取得・レンダリング・再読み込みを提供する。

pub mod config;
pub mod content;
pub mod error;
pub mod server;
pub mod tools;

// 主要な型の再エクスポート
pub use config::Config;
pub use content::{PromptRegistry, PromptTemplate, RenderOutput, Skill};
pub use error::RegistryError;
pub use server::{AppState, HealthReport, PromptsServer};
pub use tools::{Tool, ToolRegistry};

/// バージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCPの `serverInfo.name`
pub const SERVER_NAME: &str = "prompts-mcp-server";
