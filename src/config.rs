//! 設定ファイル管理モジュール
//!
//! TOMLファイル → 環境変数 → コマンドライン引数 の順に上書きして
//! サーバーの設定を組み立てる。読み込みは起動時の一度だけ。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 設定ファイルパスを指定する環境変数
pub const CONFIG_ENV: &str = "PROMPTS_MCP_CONFIG";
/// テンプレートディレクトリの環境変数
pub const TEMPLATES_DIR_ENV: &str = "TEMPLATES_DIR";
/// スキルディレクトリの環境変数
pub const SKILLS_DIR_ENV: &str = "SKILLS_DIR";
/// 待ち受けポートの環境変数
pub const PORT_ENV: &str = "PORT";

/// `RUST_LOG` 未指定時のログレベル（通常INFO、詳細表示でDEBUG）
pub fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// アプリケーション全体の設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTPサーバー設定
    #[serde(default)]
    pub server: ServerConfig,
    /// テンプレート設定
    #[serde(default)]
    pub templates: DirectoryConfig,
    /// スキル設定
    #[serde(default)]
    pub skills: DirectoryConfig,
}

/// HTTPサーバー設定
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// バインドするホスト
    #[serde(default = "default_host")]
    pub host: String,
    /// 待ち受けポート
    #[serde(default = "default_port")]
    pub port: u16,
}

/// 読み込み元ディレクトリ設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    /// ディレクトリパス（未指定ならカレントディレクトリ直下の既定名）
    pub dir: Option<PathBuf>,
}

// デフォルト値を返す関数群
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// TOMLファイルから設定を読み込む
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// TOML文字列から設定をパース
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// デフォルト設定ファイルパスを取得（存在するもののみ）
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(config_path));
        }

        // カレントディレクトリのconfig/default.toml
        let cwd_config = PathBuf::from("config/default.toml");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        // ホームディレクトリの.prompts-mcp-server/config.toml
        dirs::home_dir()
            .map(|home| home.join(".prompts-mcp-server").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// 設定ファイルを読み込む。ファイルがない・壊れている場合は既定値
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        match path {
            Some(path) => Self::load_from_file(&path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config file: {:#}, using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// 環境変数で上書き
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// `lookup` から得た値で上書き（テスト用に分離）
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(TEMPLATES_DIR_ENV).filter(|v| !v.is_empty()) {
            self.templates.dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(SKILLS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.skills.dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Invalid {} value '{}', keeping {}", PORT_ENV, port, self.server.port),
            }
        }
    }

    /// テンプレートディレクトリ（絶対パス）
    pub fn templates_dir(&self, cwd: &Path) -> PathBuf {
        resolve_dir(self.templates.dir.as_deref(), cwd, "templates")
    }

    /// スキルディレクトリ（絶対パス）
    pub fn skills_dir(&self, cwd: &Path) -> PathBuf {
        resolve_dir(self.skills.dir.as_deref(), cwd, "skills")
    }

    /// バインドアドレス
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// 相対パスは `cwd` 基準で解決
fn resolve_dir(dir: Option<&Path>, cwd: &Path, default_name: &str) -> PathBuf {
    match dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.join(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.templates.dir.is_none());
        assert!(config.skills.dir.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8080

[templates]
dir = "/srv/prompts"

[skills]
dir = "my-skills"
"#;
        let config = Config::parse(toml_content).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.templates_dir(Path::new("/work")), PathBuf::from("/srv/prompts"));
        assert_eq!(config.skills_dir(Path::new("/work")), PathBuf::from("/work/my-skills"));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[server]\nport = 4000\n").unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0"); // デフォルト値
        assert_eq!(config.templates_dir(Path::new("/work")), PathBuf::from("/work/templates"));
        assert_eq!(config.skills_dir(Path::new("/work")), PathBuf::from("/work/skills"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::parse("[server\nport = ").is_err());
        assert!(Config::parse("[server]\nport = \"abc\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse("[server]\nport = 4000\n[templates]\ndir = \"from-file\"\n").unwrap();
        config.apply_overrides(env(&[
            (TEMPLATES_DIR_ENV, "/env/templates"),
            (SKILLS_DIR_ENV, "rel/skills"),
            (PORT_ENV, "5000"),
        ]));

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.templates_dir(Path::new("/work")), PathBuf::from("/env/templates"));
        assert_eq!(config.skills_dir(Path::new("/work")), PathBuf::from("/work/rel/skills"));
    }

    #[test]
    fn test_invalid_port_env_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[(PORT_ENV, "not-a-port"), (TEMPLATES_DIR_ENV, "")]));

        assert_eq!(config.server.port, 3000);
        assert!(config.templates.dir.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[skills]\ndir = \"/data/skills\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.skills_dir(Path::new("/work")), PathBuf::from("/data/skills"));
    }
}
