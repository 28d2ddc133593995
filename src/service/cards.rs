use crate::config::WorkspaceConfig;
use crate::db::{Card, CardDraft, CardStatus, Page, PageSpec, Store, StoreTx};
use crate::error::{CoreError, CoreResult};
use crate::service::accounts::{AccountProvisioner, Principal};
use crate::service::guard::{authorize_card_in, authorize_folder_in};
use crate::service::require_text;
use chrono::Utc;
use tracing::debug;

#[derive(Clone)]
pub struct CardLifecycle<S> {
    store: S,
    accounts: AccountProvisioner<S>,
    max_page_size: u32,
    max_bulk_cards: usize,
}

impl<S: Store + Clone> CardLifecycle<S> {
    pub fn new(store: S, cfg: &WorkspaceConfig) -> Self {
        Self {
            accounts: AccountProvisioner::new(store.clone()),
            store,
            max_page_size: cfg.max_page_size,
            max_bulk_cards: cfg.max_bulk_cards,
        }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        folder_id: i64,
        spec: PageSpec,
    ) -> CoreResult<Page<Card>> {
        self.page(principal, folder_id, None, spec).await
    }

    pub async fn list_by_status(
        &self,
        principal: &Principal,
        folder_id: i64,
        status: CardStatus,
        spec: PageSpec,
    ) -> CoreResult<Page<Card>> {
        self.page(principal, folder_id, Some(status), spec).await
    }

    async fn page(
        &self,
        principal: &Principal,
        folder_id: i64,
        status: Option<CardStatus>,
        spec: PageSpec,
    ) -> CoreResult<Page<Card>> {
        let account = self.accounts.must_resolve(principal).await?;
        let mut tx = self.store.begin_read().await?;
        let folder = authorize_folder_in(&mut tx, &account, folder_id).await?;
        let page = tx
            .list_cards(
                account.id,
                folder.id,
                status,
                spec.clamped(self.max_page_size),
            )
            .await?;
        Ok(page)
    }

    /// Creates one card in the folder with the default status.
    pub async fn create(
        &self,
        principal: &Principal,
        folder_id: i64,
        draft: &CardDraft,
    ) -> CoreResult<Card> {
        let mut cards = self
            .create_many(principal, folder_id, std::slice::from_ref(draft))
            .await?;
        cards
            .pop()
            .ok_or_else(|| CoreError::InvalidInput("no card was created".to_string()))
    }

    /// Creates every draft in one transaction; either all cards exist afterwards or none.
    pub async fn create_many(
        &self,
        principal: &Principal,
        folder_id: i64,
        drafts: &[CardDraft],
    ) -> CoreResult<Vec<Card>> {
        if drafts.is_empty() || drafts.len() > self.max_bulk_cards {
            return Err(CoreError::InvalidInput(format!(
                "must provide between 1 and {} cards",
                self.max_bulk_cards
            )));
        }
        drafts.iter().try_for_each(validate_draft)?;

        let account = self.accounts.must_resolve(principal).await?;
        let mut tx = self.store.begin_write().await?;
        let folder = authorize_folder_in(&mut tx, &account, folder_id).await?;

        let now = Utc::now();
        let mut cards = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let card = tx
                .insert_card(account.id, folder.id, draft, CardStatus::default(), now)
                .await?;
            cards.push(card);
        }
        tx.commit().await?;

        debug!(
            account_id = account.id,
            folder_id,
            created = cards.len(),
            "cards created"
        );
        Ok(cards)
    }

    /// Overwrites question and answer; status is left untouched.
    pub async fn update(
        &self,
        principal: &Principal,
        folder_id: i64,
        card_id: i64,
        draft: &CardDraft,
    ) -> CoreResult<()> {
        validate_draft(draft)?;
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        let (_, card) = authorize_card_in(&mut tx, &account, folder_id, card_id).await?;
        tx.update_card_content(card.id, draft, Utc::now()).await?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id, card_id, "card updated");
        Ok(())
    }

    pub async fn set_status(
        &self,
        principal: &Principal,
        folder_id: i64,
        card_id: i64,
        status: CardStatus,
    ) -> CoreResult<()> {
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        let (_, card) = authorize_card_in(&mut tx, &account, folder_id, card_id).await?;
        tx.update_card_status(card.id, status, Utc::now()).await?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id, card_id, %status, "card status set");
        Ok(())
    }

    pub async fn delete(&self, principal: &Principal, folder_id: i64, card_id: i64) -> CoreResult<()> {
        let account = self.accounts.must_resolve(principal).await?;

        let mut tx = self.store.begin_write().await?;
        let (_, card) = authorize_card_in(&mut tx, &account, folder_id, card_id).await?;
        tx.delete_card(card.id).await?;
        tx.commit().await?;

        debug!(account_id = account.id, folder_id, card_id, "card deleted");
        Ok(())
    }

    pub async fn count(&self, principal: &Principal, folder_id: i64) -> CoreResult<u64> {
        let account = self.accounts.must_resolve(principal).await?;
        let mut tx = self.store.begin_read().await?;
        let folder = authorize_folder_in(&mut tx, &account, folder_id).await?;
        let count = tx.count_cards(folder.id).await?;
        Ok(count)
    }
}

fn validate_draft(draft: &CardDraft) -> CoreResult<()> {
    require_text("question", &draft.question)?;
    require_text("answer", &draft.answer)
}
