use std::path::PathBuf;

use marquee_model::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to resolve {}: {reason}", .path.display())]
    Resolution { path: PathBuf, reason: String },

    #[error("Refresh of item {id} failed: {reason}")]
    RefreshFailed { id: ItemId, reason: String },

    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl MediaError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MediaError::Cancelled(_))
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
