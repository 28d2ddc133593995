//! Ownership checks every folder and card operation passes through.

use crate::db::{Account, Card, Folder, Store, StoreTx};
use crate::error::{CoreError, CoreResult};
use tracing::debug;

/// Read-only gate binding folders and cards to the account asking for them.
#[derive(Clone)]
pub struct OwnershipGuard<S> {
    store: S,
}

impl<S: Store> OwnershipGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn authorize_folder(&self, account: &Account, folder_id: i64) -> CoreResult<Folder> {
        let mut tx = self.store.begin_read().await?;
        authorize_folder_in(&mut tx, account, folder_id).await
    }

    pub async fn authorize_card(
        &self,
        account: &Account,
        folder_id: i64,
        card_id: i64,
    ) -> CoreResult<Card> {
        let mut tx = self.store.begin_read().await?;
        let (_, card) = authorize_card_in(&mut tx, account, folder_id, card_id).await?;
        Ok(card)
    }
}

/// Loads `folder_id` and checks that `account` owns it, inside the caller's transaction.
///
/// Ownership is the (account id, folder name) existence probe that also backs
/// the per-account name uniqueness, plus equality of the folder's owner id.
pub(crate) async fn authorize_folder_in<T: StoreTx>(
    tx: &mut T,
    account: &Account,
    folder_id: i64,
) -> CoreResult<Folder> {
    let folder = tx
        .folder_by_id(folder_id)
        .await?
        .ok_or(CoreError::FolderNotFound(folder_id))?;

    let owns_name = tx.folder_name_exists(account.id, &folder.name).await?;
    if !owns_name || folder.account_id != account.id {
        debug!(account_id = account.id, folder_id, "folder access denied");
        return Err(CoreError::AccessDenied(folder_id));
    }

    Ok(folder)
}

/// Authorizes the folder, then looks the card up scoped to that folder.
pub(crate) async fn authorize_card_in<T: StoreTx>(
    tx: &mut T,
    account: &Account,
    folder_id: i64,
    card_id: i64,
) -> CoreResult<(Folder, Card)> {
    let folder = authorize_folder_in(tx, account, folder_id).await?;
    let card = tx
        .card_in_folder(card_id, folder.id)
        .await?
        .ok_or(CoreError::CardNotFound(card_id))?;
    Ok((folder, card))
}
