use crate::config::WorkspaceConfig;
use crate::db::SqliteStore;
use crate::server::routes::{cards, folders, users};
use crate::service::Workspace;

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct FlashdeckState {
    pub workspace: Workspace<SqliteStore>,
    pub gateway_key: Arc<str>,
    pub folder_page_size: u32,
    pub card_page_size: u32,
}

impl FlashdeckState {
    pub fn new(store: SqliteStore, gateway_key: Arc<str>, cfg: &WorkspaceConfig) -> Self {
        Self {
            workspace: Workspace::new(store, cfg),
            gateway_key,
            folder_page_size: cfg.folder_page_size,
            card_page_size: cfg.card_page_size,
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id` for easier correlation, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn flashdeck_router(state: FlashdeckState) -> Router {
    let api = Router::new()
        .route("/api/users", post(users::sync_user))
        .route(
            "/api/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route(
            "/api/folders/{folder_id}",
            get(cards::list_cards)
                .put(folders::rename_folder)
                .delete(folders::delete_folder),
        )
        .route("/api/folders/{folder_id}/cards", post(cards::create_card))
        .route(
            "/api/folders/{folder_id}/cards/bulk",
            post(cards::create_cards_bulk),
        )
        .route(
            "/api/folders/{folder_id}/cards/count",
            get(cards::count_cards),
        )
        .route(
            "/api/folders/{folder_id}/cards/status/{status}",
            get(cards::list_cards_by_status),
        )
        .route(
            "/api/folders/{folder_id}/cards/{card_id}",
            put(cards::update_card).delete(cards::delete_card),
        )
        .route(
            "/api/folders/{folder_id}/cards/{card_id}/status",
            patch(cards::set_card_status),
        );

    Router::new()
        .merge(api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
