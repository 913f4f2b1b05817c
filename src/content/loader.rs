use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::metadata::parse_header;
use super::{Artifact, ARTIFACT_EXTENSION};
use crate::error::{RegistryError, Result};

/// 読み込み対象のファイル
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArtifactFile {
    name: String,
    path: PathBuf,
}

/// ディレクトリ内の全成果物を読み込み
///
/// ディレクトリが存在しない場合は警告を出して空を返す。
/// 読めないファイルが1つでもあればエラー。
pub async fn load_all<A: Artifact>(dir: &Path) -> Result<Vec<A>> {
    if !dir.exists() {
        warn!("{} directory not found: {}", A::KIND, dir.display());
        return Ok(Vec::new());
    }

    let files = scan_directory::<A>(dir).await?;
    let mut artifacts = Vec::with_capacity(files.len());
    for file in files {
        artifacts.push(read_artifact::<A>(file.name, &file.path).await?);
    }

    debug!("Loaded {} {} from {}", artifacts.len(), A::KIND.plural(), dir.display());
    Ok(artifacts)
}

/// 単一ファイルを読み込み
pub async fn load_file<A: Artifact>(path: &Path) -> Result<A> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    read_artifact(name, path).await
}

/// `{dir}/{name}.md` が存在すればそのパス
pub fn resolve_path(dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return None;
    }

    let path = dir.join(format!("{}.{}", name, ARTIFACT_EXTENSION));
    path.is_file().then_some(path)
}

async fn read_artifact<A: Artifact>(name: String, path: &Path) -> Result<A> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| RegistryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    let parsed = parse_header(&raw, A::DIALECTS);
    debug!(
        "Parsed {} '{}' (header: {:?})",
        A::KIND.singular(),
        name,
        parsed.dialect
    );
    Ok(A::from_parsed(name, parsed))
}

/// 対象ファイルを列挙し、名前順に並べる
async fn scan_directory<A: Artifact>(dir: &Path) -> Result<Vec<ArtifactFile>> {
    let read_dir_error = |source: std::io::Error| RegistryError::ReadDir {
        kind: A::KIND,
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        let is_markdown = path.extension().and_then(|ext| ext.to_str()) == Some(ARTIFACT_EXTENSION);
        if !path.is_file() || !is_markdown {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            debug!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };

        files.push(ArtifactFile {
            name: name.to_string(),
            path,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
