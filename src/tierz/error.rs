use crate::model::{ItemId, TierId};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TierzError {
    #[error("Tier {tier} only accepts its anchor item, not {item}")]
    TierRestricted { item: ItemId, tier: TierId },

    #[error("Item {item} is anchored to tier {tier} and cannot leave it")]
    AnchorImmovable { item: ItemId, tier: TierId },

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Tier not found: {0}")]
    TierNotFound(TierId),

    #[error("Could not save the arrangement: {0}")]
    Persistence(String),

    #[error("Could not load the arrangement: {0}")]
    Load(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TierzError>;

impl TierzError {
    /// Invalid gestures rather than system faults. The session rejects these
    /// silently and leaves the arrangement untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TierzError::TierRestricted { .. }
                | TierzError::AnchorImmovable { .. }
                | TierzError::ItemNotFound(_)
                | TierzError::TierNotFound(_)
        )
    }

    /// Reports a failed read as `Load`, keeping an existing `Load` as is.
    pub fn into_load(self) -> TierzError {
        match self {
            TierzError::Load(_) => self,
            other => TierzError::Load(other.to_string()),
        }
    }

    /// Reports a failed write as `Persistence`, keeping an existing one as is.
    pub fn into_persistence(self) -> TierzError {
        match self {
            TierzError::Persistence(_) => self,
            other => TierzError::Persistence(other.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TierzError::TierRestricted { .. } => ErrorKind::TierRestricted,
            TierzError::AnchorImmovable { .. } => ErrorKind::AnchorImmovable,
            TierzError::ItemNotFound(_) | TierzError::TierNotFound(_) => ErrorKind::NotFound,
            TierzError::Persistence(_) => ErrorKind::Persistence,
            TierzError::Load(_) => ErrorKind::Load,
            TierzError::Catalog(_) => ErrorKind::Catalog,
            TierzError::Io(_) | TierzError::Serialization(_) => ErrorKind::Internal,
            TierzError::Api(_) => ErrorKind::InvalidInput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TierRestricted,
    AnchorImmovable,
    NotFound,
    Persistence,
    Load,
    Catalog,
    InvalidInput,
    Internal,
}

/// What a view layer needs to display a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&TierzError> for ErrorDescriptor {
    fn from(err: &TierzError) -> Self {
        let kind = err.kind();
        let retryable = matches!(kind, ErrorKind::Persistence | ErrorKind::Load);
        let message = if retryable {
            format!("{}. Please try again.", err)
        } else {
            err.to_string()
        };
        Self {
            kind,
            message,
            retryable,
        }
    }
}
