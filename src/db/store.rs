//! Persistence contract consumed by the service layer.
//!
//! Account provisioning runs in autocommit mode so that a conflicting insert
//! from another worker is visible to the reread that follows it. Everything
//! scoped to folders and cards runs inside a [`StoreTx`], so the ownership
//! check and the mutation it gates observe the same state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

use super::models::{Account, Card, CardDraft, CardStatus, Folder};
use super::page::{Page, PageSpec};

#[derive(Debug, ThisError)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(db.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTx;

    async fn account_by_external_id(&self, external_id: &str) -> StoreResult<Option<Account>>;

    /// Inserts a new account. Surfaces [`StoreError::UniqueViolation`] when the
    /// external identity is already taken.
    async fn insert_account(&self, external_id: &str, now: DateTime<Utc>) -> StoreResult<Account>;

    /// Opens a transaction for read-only work.
    async fn begin_read(&self) -> StoreResult<Self::Tx>;

    /// Opens a transaction that holds the write lock from its first statement.
    async fn begin_write(&self) -> StoreResult<Self::Tx>;
}

#[async_trait]
pub trait StoreTx: Send {
    async fn folder_by_id(&mut self, folder_id: i64) -> StoreResult<Option<Folder>>;

    async fn folder_name_exists(&mut self, account_id: i64, name: &str) -> StoreResult<bool>;

    async fn insert_folder(
        &mut self,
        account_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Folder>;

    async fn list_folders(&mut self, account_id: i64, spec: PageSpec) -> StoreResult<Page<Folder>>;

    /// Returns the number of rows changed.
    async fn rename_folder(
        &mut self,
        folder_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn delete_cards_in_folder(&mut self, folder_id: i64) -> StoreResult<u64>;

    async fn delete_folder(&mut self, folder_id: i64) -> StoreResult<u64>;

    async fn card_in_folder(&mut self, card_id: i64, folder_id: i64) -> StoreResult<Option<Card>>;

    /// Pages the cards of one folder, optionally narrowed to one status.
    async fn list_cards(
        &mut self,
        account_id: i64,
        folder_id: i64,
        status: Option<CardStatus>,
        spec: PageSpec,
    ) -> StoreResult<Page<Card>>;

    async fn count_cards(&mut self, folder_id: i64) -> StoreResult<u64>;

    async fn insert_card(
        &mut self,
        account_id: i64,
        folder_id: i64,
        draft: &CardDraft,
        status: CardStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Card>;

    async fn update_card_content(
        &mut self,
        card_id: i64,
        draft: &CardDraft,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn update_card_status(
        &mut self,
        card_id: i64,
        status: CardStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn delete_card(&mut self, card_id: i64) -> StoreResult<u64>;

    async fn commit(self) -> StoreResult<()>;
}
