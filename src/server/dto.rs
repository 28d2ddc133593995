//! Wire shapes of the HTTP API. Field names are camelCase on the wire.

use crate::db::{Account, Card, CardDraft, CardStatus, Folder, PageSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: i64,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            external_id: account.external_id,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FolderDto {
    pub id: i64,
    pub name: String,
}

impl From<Folder> for FolderDto {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            question: card.question,
            answer: card.answer,
            status: card.status,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub question: String,
    pub answer: String,
}

impl From<CardRequest> for CardDraft {
    fn from(req: CardRequest) -> Self {
        CardDraft::new(req.question, req.answer)
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCardRequest {
    pub cards: Vec<CardRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CardStatusRequest {
    pub status: CardStatus,
}

/// `?page=&size=` query; missing values fall back to the route's defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn to_spec(&self, default_size: u32) -> PageSpec {
        PageSpec::new(self.page.unwrap_or(0), self.size.unwrap_or(default_size))
    }
}
