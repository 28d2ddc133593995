use crate::config::{RenameCheck, WorkspaceConfig};
use crate::db::{Folder, Page, PageSpec, Store, StoreError, StoreTx};
use crate::error::{CoreError, CoreResult};
use crate::service::accounts::{AccountProvisioner, Principal};
use crate::service::guard::authorize_folder_in;
use crate::service::require_text;
use chrono::Utc;
use tracing::debug;

#[derive(Clone)]
pub struct FolderLifecycle<S> {
    store: S,
    accounts: AccountProvisioner<S>,
    rename_check: RenameCheck,
    max_page_size: u32,
}

impl<S: Store + Clone> FolderLifecycle<S> {
    pub fn new(store: S, cfg: &WorkspaceConfig) -> Self {
        Self {
            accounts: AccountProvisioner::new(store.clone()),
            store,
            rename_check: cfg.rename_check,
            max_page_size: cfg.max_page_size,
        }
    }

    /// Creates a folder named `name` for the caller.
    ///
    /// The existence probe gives the common case a clean error; the store's
    /// UNIQUE(account_id, name) catches the concurrent one. Both surface as
    /// [`CoreError::FolderAlreadyExists`].
    pub async fn create(&self, principal: &Principal, name: &str) -> CoreResult<Folder> {
        require_text("name", name)?;
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        if tx.folder_name_exists(account.id, name).await? {
            return Err(CoreError::FolderAlreadyExists(name.to_string()));
        }
        let folder = tx
            .insert_folder(account.id, name, Utc::now())
            .await
            .map_err(|err| name_conflict(err, name))?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id = folder.id, "folder created");
        Ok(folder)
    }

    pub async fn list(&self, principal: &Principal, spec: PageSpec) -> CoreResult<Page<Folder>> {
        let account = self.accounts.must_resolve(principal).await?;
        let mut tx = self.store.begin_read().await?;
        let page = tx
            .list_folders(account.id, spec.clamped(self.max_page_size))
            .await?;
        Ok(page)
    }

    /// Renames a folder the caller owns.
    ///
    /// With [`RenameCheck::CurrentName`] the only gate is the ownership probe on
    /// the folder's current name; with [`RenameCheck::NewName`] the requested
    /// name is also probed against the caller's other folders.
    pub async fn rename(
        &self,
        principal: &Principal,
        folder_id: i64,
        new_name: &str,
    ) -> CoreResult<Folder> {
        require_text("name", new_name)?;
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        let mut folder = authorize_folder_in(&mut tx, &account, folder_id).await?;

        if self.rename_check == RenameCheck::NewName
            && folder.name != new_name
            && tx.folder_name_exists(account.id, new_name).await?
        {
            return Err(CoreError::FolderAlreadyExists(new_name.to_string()));
        }

        let now = Utc::now();
        tx.rename_folder(folder.id, new_name, now)
            .await
            .map_err(|err| name_conflict(err, new_name))?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id, "folder renamed");
        folder.name = new_name.to_string();
        folder.updated_at = now;
        Ok(folder)
    }

    /// Deletes a folder and every card in it, in one transaction.
    pub async fn delete(&self, principal: &Principal, folder_id: i64) -> CoreResult<()> {
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        let folder = authorize_folder_in(&mut tx, &account, folder_id).await?;
        let cards = tx.delete_cards_in_folder(folder.id).await?;
        tx.delete_folder(folder.id).await?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id, cards, "folder deleted");
        Ok(())
    }
}

fn name_conflict(err: StoreError, name: &str) -> CoreError {
    match err {
        StoreError::UniqueViolation(_) => CoreError::FolderAlreadyExists(name.to_string()),
        other => CoreError::Storage(other),
    }
}
