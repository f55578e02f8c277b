use std::fmt;

use platform_backend::{BackendError, ParseRecordIdError};
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

/// Mutation kinds reported by batch failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BatchAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
}

impl BatchAction {
    pub fn verb(self) -> &'static str {
        match self {
            BatchAction::Create => "create",
            BatchAction::Update => "update",
            BatchAction::Delete => "delete",
            BatchAction::Approve => "approve",
            BatchAction::Reject => "reject",
        }
    }

    /// Decisions name the request itself, other actions the record.
    fn object_suffix(self) -> &'static str {
        match self {
            BatchAction::Approve | BatchAction::Reject => "",
            _ => " record",
        }
    }
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Error)]
pub enum HrError {
    /// The backend answered with `success: false`.
    #[error("{message}")]
    Backend { message: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// At least one record of a batch mutation failed.
    #[error("Failed to {action} {entity}{}", .action.object_suffix())]
    BatchFailed {
        action: BatchAction,
        entity: &'static str,
        failed: usize,
    },
    /// The call failed in transport; `message` was unwrapped from the error body.
    #[error("{message}")]
    Transport { status: u16, message: String },
    #[error(transparent)]
    Client(BackendError),
    #[error("{entity} {action} succeeded but returned no record")]
    MissingData {
        action: BatchAction,
        entity: &'static str,
    },
    #[error("invalid {entity} payload: {source}")]
    Decode {
        entity: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HrError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HrError::NotFound { .. })
    }
}

impl From<BackendError> for HrError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected { status, message } => HrError::Transport { status, message },
            other => HrError::Client(other),
        }
    }
}

impl From<ParseRecordIdError> for HrError {
    fn from(err: ParseRecordIdError) -> Self {
        HrError::InvalidInput(err.to_string())
    }
}
