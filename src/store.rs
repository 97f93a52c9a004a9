pub mod document;
pub mod envelope;
pub mod remote;
pub mod repository;

use crate::wizard::state::WizardState;
use document::PersistedConfiguration;

pub use document::ConfigurationId;

pub const GENERIC_CREATE_ERROR: &str = "Failed to save configuration";
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch configurations";
pub const GENERIC_UPDATE_ERROR: &str = "Failed to update configuration";
pub const GENERIC_DELETE_ERROR: &str = "Failed to delete configuration";
pub const NOT_FOUND_ERROR: &str = "Configuration not found";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<String>,
    },
    #[error("{NOT_FOUND_ERROR}")]
    NotFound,
    #[error("sqlite open failed at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create store parent {path}: {source}")]
    CreateParent {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite statement failed: {source}")]
    Sql {
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to encode configuration document: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("stored configuration document is corrupt: {0}")]
    CorruptDocument(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("failed to generate configuration id: {0}")]
    IdGeneration(String),
}

impl StoreError {
    /// Text shown in the wizard's error banner: server-provided messages pass
    /// through, everything else collapses to the generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StoreError::Validation { message, .. } => message.clone(),
            StoreError::NotFound => NOT_FOUND_ERROR.to_string(),
            StoreError::Service { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// The persistence service seam. The wizard core depends only on this shape;
/// the SQLite repository and the remote HTTP client both implement it.
pub trait ConfigurationStore {
    fn create(&self, aggregate: &WizardState) -> Result<PersistedConfiguration, StoreError>;
    fn list(&self) -> Result<Vec<PersistedConfiguration>, StoreError>;
    fn get(&self, id: &str) -> Result<PersistedConfiguration, StoreError>;
    fn update(
        &self,
        id: &str,
        partial: &serde_json::Value,
    ) -> Result<PersistedConfiguration, StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
