use crate::db::{CardDraft, CardStatus, Page};
use crate::error::CoreError;
use crate::server::dto::{BulkCardRequest, CardDto, CardRequest, CardStatusRequest, PageQuery};
use crate::server::guards::auth::Caller;
use crate::server::router::FlashdeckState;
use crate::server::routes::{json_body, path_params, query_params};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// GET /api/folders/{folder_id}?page=&size=
pub async fn list_cards(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<CardDto>>, CoreError> {
    let folder_id = path_params(folder_id)?;
    let spec = query_params(query)?.to_spec(state.card_page_size);
    let page = state
        .workspace
        .cards
        .list(&principal, folder_id, spec)
        .await?;
    Ok(Json(page.map(CardDto::from)))
}

/// GET /api/folders/{folder_id}/cards/status/{status}?page=&size=
pub async fn list_cards_by_status(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    params: Result<Path<(i64, String)>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<CardDto>>, CoreError> {
    let (folder_id, status) = path_params(params)?;
    let status: CardStatus = status.parse().map_err(CoreError::InvalidInput)?;
    let spec = query_params(query)?.to_spec(state.card_page_size);
    let page = state
        .workspace
        .cards
        .list_by_status(&principal, folder_id, status, spec)
        .await?;
    Ok(Json(page.map(CardDto::from)))
}

/// GET /api/folders/{folder_id}/cards/count
pub async fn count_cards(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<u64>, CoreError> {
    let folder_id = path_params(folder_id)?;
    let count = state.workspace.cards.count(&principal, folder_id).await?;
    Ok(Json(count))
}

/// POST /api/folders/{folder_id}/cards
pub async fn create_card(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<Json<CardDto>, CoreError> {
    let folder_id = path_params(folder_id)?;
    let draft = CardDraft::from(json_body(payload)?);
    let card = state
        .workspace
        .cards
        .create(&principal, folder_id, &draft)
        .await?;
    Ok(Json(card.into()))
}

/// POST /api/folders/{folder_id}/cards/bulk
pub async fn create_cards_bulk(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    folder_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BulkCardRequest>, JsonRejection>,
) -> Result<Json<Vec<CardDto>>, CoreError> {
    let folder_id = path_params(folder_id)?;
    let drafts: Vec<CardDraft> = json_body(payload)?
        .cards
        .into_iter()
        .map(CardDraft::from)
        .collect();
    let cards = state
        .workspace
        .cards
        .create_many(&principal, folder_id, &drafts)
        .await?;
    Ok(Json(cards.into_iter().map(CardDto::from).collect()))
}

/// PUT /api/folders/{folder_id}/cards/{card_id}
pub async fn update_card(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    params: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<StatusCode, CoreError> {
    let (folder_id, card_id) = path_params(params)?;
    let draft = CardDraft::from(json_body(payload)?);
    state
        .workspace
        .cards
        .update(&principal, folder_id, card_id, &draft)
        .await?;
    Ok(StatusCode::OK)
}

/// PATCH /api/folders/{folder_id}/cards/{card_id}/status
pub async fn set_card_status(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    params: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<CardStatusRequest>, JsonRejection>,
) -> Result<StatusCode, CoreError> {
    let (folder_id, card_id) = path_params(params)?;
    let req = json_body(payload)?;
    state
        .workspace
        .cards
        .set_status(&principal, folder_id, card_id, req.status)
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/folders/{folder_id}/cards/{card_id}
pub async fn delete_card(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
    params: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, CoreError> {
    let (folder_id, card_id) = path_params(params)?;
    state
        .workspace
        .cards
        .delete(&principal, folder_id, card_id)
        .await?;
    Ok(StatusCode::OK)
}
