use crate::types::EditMode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Media metadata has not loaded")]
    MediaNotReady,

    #[error("An edit is already in progress: {0}")]
    EditInProgress(EditMode),

    #[error("Trim has already been applied for this session")]
    TrimLocked,

    #[error("No edit in progress")]
    NothingToApply,
}

pub type Result<T> = std::result::Result<T, CoreError>;
