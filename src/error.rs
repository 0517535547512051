use thiserror::Error;

use crate::lockfile::LockfileError;

#[derive(Debug, Error)]
pub enum LockgraphError {
    #[error("lockfile error: {0}")]
    Lockfile(#[from] LockfileError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LockgraphError>;
