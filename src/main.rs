use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use prompts_mcp_server::config::{self, Config};
use prompts_mcp_server::{server, AppState, PromptRegistry};

#[derive(Parser, Debug)]
#[command(name = "prompts-mcp-server")]
#[command(about = "プロンプトテンプレートとスキルを配信するMCPサーバー")]
#[command(version)]
struct Args {
    /// 設定ファイルパス
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// バインドするホスト
    #[arg(long)]
    host: Option<String>,

    /// 待ち受けポート
    #[arg(short, long)]
    port: Option<u16>,

    /// テンプレートディレクトリ
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// スキルディレクトリ
    #[arg(long)]
    skills_dir: Option<PathBuf>,

    /// 詳細ログを表示 (DEBUG level)
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // トレーシング初期化（デフォルトはINFO、--verboseでDEBUG）。出力はstderr
    let args = Args::parse();
    let default_level = config::default_log_level(args.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 設定ファイル → 環境変数 → 引数 の順に上書き
    let mut config = Config::load(args.config.as_deref());
    config.apply_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.templates_dir {
        config.templates.dir = Some(dir);
    }
    if let Some(dir) = args.skills_dir {
        config.skills.dir = Some(dir);
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let registry = Arc::new(PromptRegistry::new(
        config.templates_dir(&cwd),
        config.skills_dir(&cwd),
    ));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("{} v{} starting...", prompts_mcp_server::SERVER_NAME, prompts_mcp_server::VERSION);
    tracing::info!("Listening on http://{}/mcp", listener.local_addr()?);
    log_startup_summary(&registry).await;

    server::serve(listener, AppState::new(registry), shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// 起動時に読み込み対象を表示
async fn log_startup_summary(registry: &PromptRegistry) {
    tracing::info!("Templates directory: {}", registry.templates().dir().display());
    match registry.templates().names().await {
        Ok(names) => tracing::info!("Loaded {} template(s): {}", names.len(), join_or_none(&names)),
        Err(e) => tracing::warn!("Failed to load templates: {}", e),
    }

    tracing::info!("Skills directory: {}", registry.skills().dir().display());
    match registry.skills().names().await {
        Ok(names) => tracing::info!("Loaded {} skill(s): {}", names.len(), join_or_none(&names)),
        Err(e) => tracing::warn!("Failed to load skills: {}", e),
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        // シグナルを受け取れない場合は停止しない
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
