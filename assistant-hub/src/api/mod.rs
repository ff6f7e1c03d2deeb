//! HTTP API: each endpoint validates its payload and performs one workspace
//! operation.

mod assistants;
mod chat;
mod error;
mod extract;
mod history;
mod knowledge;

pub use error::ApiError;

use crate::config::ServerConfig;
use assistant_hub_core::{chat::Responder, Workspace};
use axum::{
    extract::{DefaultBodyLimit, Request},
    handler::Handler,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const ALLOW_METHODS: &str = "POST, OPTIONS, DELETE, PUT, GET";

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Workspace>,
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Arc::new(workspace),
            responder: Arc::new(Responder::new()),
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

impl MessageResponse {
    fn new(message: &'static str) -> Self {
        Self { message }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TitleParams {
    title: String,
}

impl TitleParams {
    fn required(&self) -> Result<&str, ApiError> {
        if self.title.is_empty() {
            Err(ApiError::BadRequest("Assistant title is required"))
        } else {
            Ok(&self.title)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat::chat).fallback(method_not_allowed))
        .route(
            "/createAssistant",
            post(assistants::create_assistant).fallback(method_not_allowed),
        )
        .route(
            "/deleteAssistant",
            delete(assistants::delete_assistant).fallback(method_not_allowed),
        )
        .route(
            "/updateAssistant",
            put(assistants::update_assistant).fallback(method_not_allowed),
        )
        .route(
            "/renameAssistant",
            put(assistants::rename_assistant).fallback(method_not_allowed),
        )
        .route("/listAssistants", get_only(assistants::list_assistants))
        .route("/getRoleSetting", get_only(assistants::get_role_setting))
        .route(
            "/upload",
            post(knowledge::upload)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/create-knowledgebase",
            post(knowledge::create_knowledge_base).fallback(method_not_allowed),
        )
        .route("/list-knowledgebase", get_only(knowledge::list_knowledge_bases))
        .route(
            "/delete-knowledgebase",
            post(knowledge::delete_knowledge_base).fallback(method_not_allowed),
        )
        .route(
            "/rename-knowledgebase",
            put(knowledge::rename_knowledge_base).fallback(method_not_allowed),
        )
        .route(
            "/list-files-knowledgebase",
            post(knowledge::list_files).fallback(method_not_allowed),
        )
        .route("/chat-history", get_only(history::list_root_history))
        .route(
            "/create-history",
            post(history::create_history).fallback(method_not_allowed),
        )
        .route(
            "/delete-history",
            delete(history::delete_history).fallback(method_not_allowed),
        )
        .route(
            "/update-chat-context/{*id}",
            put(history::update_chat_context).fallback(method_not_allowed),
        )
        .route(
            "/fetch-history",
            post(history::fetch_history).fallback(method_not_allowed),
        )
        .route("/health", get_only(|| async { "OK" }))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(cors)),
        )
        .with_state(state)
}

/// Permissive CORS on every response; `OPTIONS` is answered here without
/// reaching any handler.
async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// `GET` routes that refuse `HEAD`; axum would otherwise answer it with
/// the `GET` handler.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler)
        .head(method_not_allowed)
        .fallback(method_not_allowed)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found")
}

/// Open the workspace and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let workspace = Workspace::open(&config.root).await?;
    info!(root = %workspace.root().display(), "workspace ready");
    let app = router(AppState::new(workspace));

    let listener = TcpListener::bind(config.addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
