use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::{debug, error};

use crate::db::StoreError;

/// Coarse classification of a [`CoreError`], used by callers that only care
/// about the category (HTTP mapping, tests, retries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    AlreadyExists,
    /// The store reported a conflict but the conflicting row could not be read
    /// back. Never retried.
    ConsistencyFault,
    InvalidInput,
    Storage,
}

#[derive(Debug, ThisError)]
pub enum CoreError {
    #[error("account not found for identity {0}")]
    AccountNotFound(String),

    #[error("folder does not exist by id {0}")]
    FolderNotFound(i64),

    #[error("card {0} not existing or not accessible")]
    CardNotFound(i64),

    #[error("no access to folder {0}")]
    AccessDenied(i64),

    #[error("folder with name {0} already exists")]
    FolderAlreadyExists(String),

    #[error("account for identity {0} exists but could not be loaded after constraint violation")]
    ConsistencyFault(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::AccountNotFound(_)
            | CoreError::FolderNotFound(_)
            | CoreError::CardNotFound(_) => ErrorKind::NotFound,
            CoreError::AccessDenied(_) => ErrorKind::AccessDenied,
            CoreError::FolderAlreadyExists(_) => ErrorKind::AlreadyExists,
            CoreError::ConsistencyFault(_) => ErrorKind::ConsistencyFault,
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
            ErrorKind::AlreadyExists | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::ConsistencyFault | ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Error payload returned to HTTP clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(kind = ?self.kind(), error = %self, "request failed");
            "an unexpected error occurred".to_string()
        } else {
            debug!(kind = ?self.kind(), error = %self, "request rejected");
            self.to_string()
        };

        (
            status,
            Json(ErrorDto {
                status: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}
