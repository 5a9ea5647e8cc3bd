use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    #[error("consent storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("malformed consent record: {0}")]
    MalformedRecord(String),

    #[error("invalid app id '{0}': {1}")]
    InvalidAppId(String, String),
}

impl From<serde_json::Error> for ConsentError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedRecord(e.to_string())
    }
}
