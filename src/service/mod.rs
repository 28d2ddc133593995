//! Use-case services. Every entry point resolves the caller to a stored
//! account first, authorizes the target through [`guard`], and only then
//! reads or writes.

pub mod accounts;
pub mod cards;
pub mod folders;
pub mod guard;

pub use accounts::{AccountProvisioner, Principal};
pub use cards::CardLifecycle;
pub use folders::FolderLifecycle;
pub use guard::OwnershipGuard;

use crate::config::WorkspaceConfig;
use crate::db::Store;
use crate::error::{CoreError, CoreResult};

/// All services over one store, as handed to the HTTP layer.
#[derive(Clone)]
pub struct Workspace<S> {
    pub accounts: AccountProvisioner<S>,
    pub guard: OwnershipGuard<S>,
    pub folders: FolderLifecycle<S>,
    pub cards: CardLifecycle<S>,
}

impl<S: Store + Clone> Workspace<S> {
    pub fn new(store: S, cfg: &WorkspaceConfig) -> Self {
        Self {
            accounts: AccountProvisioner::new(store.clone()),
            guard: OwnershipGuard::new(store.clone()),
            folders: FolderLifecycle::new(store.clone(), cfg),
            cards: CardLifecycle::new(store, cfg),
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{field} must not be blank")));
    }
    Ok(())
}
