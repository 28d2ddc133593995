use crate::db::{Account, Store, StoreError};
use crate::error::{CoreError, CoreResult};
use chrono::Utc;
use tracing::{error, info, warn};

/// Caller identity as handed over by the authentication layer.
///
/// Only the external identity is known here; the internal account is looked
/// up from it on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    external_id: String,
}

impl Principal {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}

/// Maps external identities to stored accounts.
#[derive(Clone)]
pub struct AccountProvisioner<S> {
    store: S,
}

impl<S: Store> AccountProvisioner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the account for `external_id`, creating it on first contact.
    ///
    /// Optimistic insert, read back on conflict: when a concurrent caller wins
    /// the insert, the UNIQUE violation is answered by rereading that caller's
    /// row. A conflict followed by an empty reread is a [`CoreError::ConsistencyFault`].
    pub async fn resolve_or_create(&self, external_id: &str) -> CoreResult<Account> {
        ensure_identity(external_id)?;

        if let Some(account) = self.store.account_by_external_id(external_id).await? {
            return Ok(account);
        }

        match self.store.insert_account(external_id, Utc::now()).await {
            Ok(account) => {
                info!(account_id = account.id, external_id, "account provisioned");
                Ok(account)
            }
            Err(StoreError::UniqueViolation(reason)) => {
                warn!(
                    external_id,
                    reason = %reason,
                    "account insert lost a race; reading back the winner"
                );
                match self.store.account_by_external_id(external_id).await? {
                    Some(account) => Ok(account),
                    None => {
                        error!(
                            external_id,
                            "account conflict reported but no row could be read back"
                        );
                        Err(CoreError::ConsistencyFault(external_id.to_string()))
                    }
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the stored account for `principal`, failing when it was never provisioned.
    pub async fn must_resolve(&self, principal: &Principal) -> CoreResult<Account> {
        let external_id = principal.external_id();
        ensure_identity(external_id)?;

        self.store
            .account_by_external_id(external_id)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(external_id.to_string()))
    }
}

fn ensure_identity(external_id: &str) -> CoreResult<()> {
    if external_id.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "external identity must not be blank".to_string(),
        ));
    }
    Ok(())
}
