use crate::db::models::{Account, Card, CardDraft, CardStatus, Folder};
use crate::db::page::{Page, PageSpec};
use crate::db::schema::SQLITE_INIT;
use crate::db::store::{Store, StoreError, StoreResult, StoreTx};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::{str::FromStr, time::Duration};
use tracing::info;

const CARD_COLUMNS: &str =
    "id, account_id, folder_id, question, answer, status, created_at, updated_at";

/// SQLite-backed store. Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `database_url` and applies the schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;

        apply_schema(&pool).await?;

        info!(database_url, "SqliteStore initialized");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for SqliteStore {
    type Tx = SqliteTx;

    async fn account_by_external_id(&self, external_id: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
        SELECT id, external_id, created_at, updated_at
        FROM accounts
        WHERE external_id = ?
        "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_account(&self, external_id: &str, now: DateTime<Utc>) -> StoreResult<Account> {
        let row = sqlx::query_as::<_, Account>(
            r#"
        INSERT INTO accounts (external_id, created_at, updated_at)
        VALUES (?, ?, ?)
        RETURNING id, external_id, created_at, updated_at
        "#,
        )
        .bind(external_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn begin_read(&self) -> StoreResult<SqliteTx> {
        let tx = self.pool.begin().await?;
        Ok(SqliteTx { tx })
    }

    async fn begin_write(&self) -> StoreResult<SqliteTx> {
        // IMMEDIATE takes the RESERVED lock up front; a deferred transaction that
        // reads first would fail with SQLITE_BUSY_SNAPSHOT once another writer commits.
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(SqliteTx { tx })
    }
}

pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn folder_by_id(&mut self, folder_id: i64) -> StoreResult<Option<Folder>> {
        let row = sqlx::query_as::<_, Folder>(
            r#"
        SELECT id, account_id, name, created_at, updated_at
        FROM folders
        WHERE id = ?
        "#,
        )
        .bind(folder_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn folder_name_exists(&mut self, account_id: i64, name: &str) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM folders WHERE account_id = ? AND name = ?)",
        )
        .bind(account_id)
        .bind(name)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn insert_folder(
        &mut self,
        account_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Folder> {
        let row = sqlx::query_as::<_, Folder>(
            r#"
        INSERT INTO folders (account_id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, account_id, name, created_at, updated_at
        "#,
        )
        .bind(account_id)
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn list_folders(&mut self, account_id: i64, spec: PageSpec) -> StoreResult<Page<Folder>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&mut *self.tx)
            .await?;

        let rows = sqlx::query_as::<_, Folder>(
            r#"
        SELECT id, account_id, name, created_at, updated_at
        FROM folders
        WHERE account_id = ?
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
        )
        .bind(account_id)
        .bind(spec.limit())
        .bind(spec.offset())
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(Page::new(rows, spec, count_to_u64(total)))
    }

    async fn rename_folder(
        &mut self,
        folder_id: i64,
        name: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let res = sqlx::query("UPDATE folders SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(now)
            .bind(folder_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(res.rows_affected())
    }

    async fn delete_cards_in_folder(&mut self, folder_id: i64) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM cards WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(res.rows_affected())
    }

    async fn delete_folder(&mut self, folder_id: i64) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(folder_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(res.rows_affected())
    }

    async fn card_in_folder(&mut self, card_id: i64, folder_id: i64) -> StoreResult<Option<Card>> {
        let row = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = ? AND folder_id = ?"
        ))
        .bind(card_id)
        .bind(folder_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn list_cards(
        &mut self,
        account_id: i64,
        folder_id: i64,
        status: Option<CardStatus>,
        spec: PageSpec,
    ) -> StoreResult<Page<Card>> {
        // `?3 IS NULL` keeps one statement for both the filtered and unfiltered listing.
        let total: i64 = sqlx::query_scalar(
            r#"
        SELECT COUNT(*) FROM cards
        WHERE account_id = ?1 AND folder_id = ?2 AND (?3 IS NULL OR status = ?3)
        "#,
        )
        .bind(account_id)
        .bind(folder_id)
        .bind(status)
        .fetch_one(&mut *self.tx)
        .await?;

        let rows = sqlx::query_as::<_, Card>(&format!(
            r#"
        SELECT {CARD_COLUMNS}
        FROM cards
        WHERE account_id = ?1 AND folder_id = ?2 AND (?3 IS NULL OR status = ?3)
        ORDER BY id
        LIMIT ?4 OFFSET ?5
        "#
        ))
        .bind(account_id)
        .bind(folder_id)
        .bind(status)
        .bind(spec.limit())
        .bind(spec.offset())
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(Page::new(rows, spec, count_to_u64(total)))
    }

    async fn count_cards(&mut self, folder_id: i64) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE folder_id = ?")
            .bind(folder_id)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(count_to_u64(total))
    }

    async fn insert_card(
        &mut self,
        account_id: i64,
        folder_id: i64,
        draft: &CardDraft,
        status: CardStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Card> {
        let row = sqlx::query_as::<_, Card>(&format!(
            r#"
        INSERT INTO cards (account_id, folder_id, question, answer, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {CARD_COLUMNS}
        "#
        ))
        .bind(account_id)
        .bind(folder_id)
        .bind(draft.question.as_str())
        .bind(draft.answer.as_str())
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn update_card_content(
        &mut self,
        card_id: i64,
        draft: &CardDraft,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let res = sqlx::query(
            r#"
            UPDATE cards
            SET
                question = ?,
                answer = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(draft.question.as_str())
        .bind(draft.answer.as_str())
        .bind(now)
        .bind(card_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(res.rows_affected())
    }

    async fn update_card_status(
        &mut self,
        card_id: i64,
        status: CardStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let res = sqlx::query("UPDATE cards SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(card_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(res.rows_affected())
    }

    async fn delete_card(&mut self, card_id: i64) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(card_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(res.rows_affected())
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(StoreError::from)
    }
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

async fn apply_schema(pool: &SqlitePool) -> StoreResult<()> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
