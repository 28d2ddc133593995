use crate::db::Page;
use crate::error::CoreError;
use crate::server::dto::{FolderDto, FolderRequest, PageQuery};
use crate::server::guards::auth::Caller;
use crate::server::router::FlashdeckState;
use crate::server::routes::{json_body, path_params, query_params};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// POST /api/folders
pub async fn create_folder(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    payload: Result<Json<FolderRequest>, JsonRejection>,
) -> Result<Json<FolderDto>, CoreError> {
    let req = json_body(payload)?;
    let folder = state.workspace.folders.create(&principal, &req.name).await?;
    Ok(Json(folder.into()))
}

/// GET /api/folders?page=&size=
pub async fn list_folders(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<FolderDto>>, CoreError> {
    let spec = query_params(query)?.to_spec(state.folder_page_size);
    let page = state.workspace.folders.list(&principal, spec).await?;
    Ok(Json(page.map(FolderDto::from)))
}

/// PUT /api/folders/{folder_id}
pub async fn rename_folder(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<FolderRequest>, JsonRejection>,
) -> Result<StatusCode, CoreError> {
    let folder_id = path_params(folder_id)?;
    let req = json_body(payload)?;
    state
        .workspace
        .folders
        .rename(&principal, folder_id, &req.name)
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/folders/{folder_id}
///
/// Removes the folder together with all of its cards.
pub async fn delete_folder(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, CoreError> {
    let folder_id = path_params(folder_id)?;
    state.workspace.folders.delete(&principal, folder_id).await?;
    Ok(StatusCode::OK)
}
