use crate::error::CoreError;
use crate::server::dto::AccountDto;
use crate::server::guards::auth::Caller;
use crate::server::router::FlashdeckState;
use axum::{Json, extract::State};

/// POST /api/users
///
/// Called by the frontend after sign-in. Provisions the account on first
/// contact and returns the stored record on every later call.
pub async fn sync_user(
    State(state): State<FlashdeckState>,
    Caller(principal): Caller,
) -> Result<Json<AccountDto>, CoreError> {
    let account = state
        .workspace
        .accounts
        .resolve_or_create(principal.external_id())
        .await?;
    Ok(Json(account.into()))
}
