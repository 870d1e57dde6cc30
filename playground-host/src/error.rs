use crate::session::{SessionAction, SessionState};
use playground_sandbox::SandboxError;
use thiserror::Error;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Surface failed to load document: {0}")]
    SurfaceLoad(String),

    #[error("Cannot {action} a session that is {from}")]
    IllegalTransition {
        from: SessionState,
        action: SessionAction,
    },

    #[error("Session clock needs a running tokio runtime")]
    NoRuntime,

    #[error("Invalid time limit: must be greater than 0 seconds")]
    InvalidTimeLimit,

    #[error("Tab {0} not found")]
    UnknownTab(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Storage data error: {0}")]
    StorageData(#[from] serde_json::Error),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}
