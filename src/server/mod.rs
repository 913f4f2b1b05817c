//! HTTPトランスポート
//!
//! - `POST /mcp`: `rmcp` のストリーミングHTTPサービス（ステートレス）
//! - `GET /health`: 読み込み件数とディレクトリの確認

pub mod handler;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::ErrorData;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::warn;

pub use self::handler::PromptsServer;
use crate::content::PromptRegistry;
use crate::tools::{default_tools, ToolRegistry};

/// `/mcp` に受け付けるリクエストボディの上限
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// ハンドラー間で共有する状態（読み取り専用）
#[derive(Clone)]
pub struct AppState {
    registry: Arc<PromptRegistry>,
    tools: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        let tools = Arc::new(default_tools(Arc::clone(&registry)));
        Self { registry, tools }
    }
}

/// `/health` の応答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub templates_loaded: usize,
    pub templates_dir: String,
    pub skills_loaded: usize,
    pub skills_dir: String,
}

impl HealthReport {
    pub async fn collect(registry: &PromptRegistry) -> crate::error::Result<Self> {
        let templates = registry.templates().load_all().await?;
        let skills = registry.skills().load_all().await?;
        Ok(Self {
            status: "ok".to_string(),
            templates_loaded: templates.len(),
            templates_dir: registry.templates().dir().display().to_string(),
            skills_loaded: skills.len(),
            skills_dir: registry.skills().dir().display().to_string(),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let server = PromptsServer::new(Arc::clone(&state.tools));
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            sse_keep_alive: None,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .nest_service("/mcp", mcp)
        .layer(middleware::from_fn(reject_null_id))
}

/// 指定リスナーでサーバーを起動し、`shutdown` が完了するまで待つ
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}

async fn health(State(state): State<AppState>) -> Response {
    match HealthReport::collect(&state.registry).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `"id": null` のメッセージを拒否する
///
/// 通知は `id` を持たないメッセージだけ。null の `id` を通知として
/// 黙って受理しないよう、MCPサービスに渡す前に弾く。
async fn reject_null_id(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    };

    if has_null_id(&bytes) {
        let error = ErrorData::invalid_request("request id must not be null", None);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "jsonrpc": "2.0", "id": null, "error": error })),
        )
            .into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn has_null_id(body: &[u8]) -> bool {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|message| message.get("id").map(Value::is_null))
        .unwrap_or(false)
}
