use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use parley_shared::constants::MAX_VIDEO_SIZE;
use parley_shared::error::UnknownCategory;
use parley_shared::intake::{self, FileMeta};
use parley_shared::reply::compose_reply;
use parley_shared::types::{Attachment, FileCategory};

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Largest accepted attachment plus headroom for multipart framing and
    // the text fields.
    let body_limit = MAX_VIDEO_SIZE as usize + 512 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .route("/api/chat", post(chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServerInfoResponse {
    name: String,
    version: &'static str,
    upload_base_url: String,
}

/// Echo of the accepted upload, mirrored back to the caller.
#[derive(Serialize)]
struct FileInfo {
    url: String,
    name: String,
    #[serde(rename = "type")]
    category: FileCategory,
    size: u64,
}

#[derive(Serialize)]
struct ChatReply {
    message: String,
    file: Option<FileInfo>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        upload_base_url: state.config.upload_base_url.clone(),
    })
}

/// The `file` part of the form, reduced to what the mock pipeline needs.
/// The payload itself is read and discarded; this build never persists it.
struct UploadPart {
    name: String,
    mime: Option<String>,
    size: u64,
}

async fn chat(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ChatReply>, ServerError> {
    let mut message: Option<String> = None;
    let mut file_type: Option<String> = None;
    let mut upload: Option<UploadPart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "message" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;
                message = Some(text);
            }
            "fileType" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;
                file_type = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;
                upload = Some(UploadPart {
                    name: file_name,
                    mime,
                    size: data.len() as u64,
                });
            }
            _ => {}
        }
    }

    let message = message.filter(|m| !m.trim().is_empty());

    let attachment = match upload {
        Some(part) => {
            let category: FileCategory = file_type
                .as_deref()
                .ok_or_else(|| {
                    ServerError::BadRequest("Missing 'fileType' for uploaded file".to_string())
                })?
                .parse()
                .map_err(|e: UnknownCategory| ServerError::BadRequest(e.to_string()))?;

            let meta = FileMeta {
                name: part.name.clone(),
                mime: part.mime.unwrap_or_default(),
                size: part.size,
            };
            intake::validate(&meta, category)?;

            let url = simulated_upload_url(&state.config.upload_base_url, &part.name);

            info!(
                name = %part.name,
                size = part.size,
                category = %category,
                "Simulated upload"
            );

            Some(Attachment {
                category,
                url,
                name: part.name,
                size: Some(part.size),
            })
        }
        None => None,
    };

    if message.is_none() && attachment.is_none() {
        return Err(ServerError::BadRequest(
            "Empty exchange: provide 'message' or 'file'".to_string(),
        ));
    }

    let reply = compose_reply(message.as_deref(), attachment.as_ref());

    Ok(Json(ChatReply {
        message: reply,
        file: attachment.map(|a| FileInfo {
            url: a.url,
            name: a.name,
            category: a.category,
            size: a.size.unwrap_or(0),
        }),
    }))
}

/// Mint the display URL of a simulated upload: `<base>/<uuid><ext>`.
/// The extension is carried over from the original filename.
fn simulated_upload_url(base: &str, original_name: &str) -> String {
    let id = Uuid::new_v4();
    match std::path::Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{base}/{id}.{ext}"),
        None => format!("{base}/{id}"),
    }
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
