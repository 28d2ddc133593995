#![allow(dead_code)]

use flashdeck::config::WorkspaceConfig;
use flashdeck::db::SqliteStore;
use flashdeck::service::{Principal, Workspace};
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a `sqlite:` URL for a file under the temp dir, unique per process and call.
pub fn temp_database_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "flashdeck-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    format!("sqlite:{}", temp_path.display())
}

/// Opens a fresh SQLite store under the temp dir.
pub async fn temp_store(tag: &str) -> SqliteStore {
    SqliteStore::connect(&temp_database_url(tag))
        .await
        .expect("failed to open temp sqlite store")
}

pub async fn workspace(tag: &str, cfg: &WorkspaceConfig) -> Workspace<SqliteStore> {
    Workspace::new(temp_store(tag).await, cfg)
}

/// Provisions `external_id` and returns its principal.
pub async fn signed_in(ws: &Workspace<SqliteStore>, external_id: &str) -> Principal {
    ws.accounts
        .resolve_or_create(external_id)
        .await
        .expect("provisioning failed");
    Principal::new(external_id)
}
