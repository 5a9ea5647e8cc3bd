use consent_core::ConsentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key '{0}': {1}")]
    InvalidKey(String, String),

    #[error("storage disabled")]
    Disabled,

    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Any storage fault leaves the record unreachable, whatever its cause.
impl From<StoreError> for ConsentError {
    fn from(e: StoreError) -> Self {
        ConsentError::StorageUnavailable(e.to_string())
    }
}
