//! レジストリのエラー型

use std::path::PathBuf;
use thiserror::Error;

use crate::content::ArtifactKind;

/// テンプレート/スキル読み込みのエラー
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 指定名のファイルが存在しない
    #[error("{kind} \"{name}\" not found. Available {}: {}", .kind.plural(), available_list(.available))]
    NotFound {
        kind: ArtifactKind,
        name: String,
        available: Vec<String>,
    },

    /// ディレクトリの列挙に失敗
    #[error("Failed to read {} directory {}: {source}", .kind.singular(), .path.display())]
    ReadDir {
        kind: ArtifactKind,
        path: PathBuf,
        source: std::io::Error,
    },

    /// ファイルの読み込みに失敗
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegistryError {
    /// not-found エラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn available_list(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
