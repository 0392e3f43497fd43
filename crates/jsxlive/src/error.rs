use thiserror::Error;

/// Rejected file operation. The project is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileOpError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("No such file: {0}")]
    NotFound(String),
    #[error("Cannot delete entry file {0}")]
    CannotDeleteEntry(String),
    #[error("Cannot rename entry file {0}")]
    CannotRenameEntry(String),
    #[error("Project has no entry file {0}")]
    MissingEntry(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to serialize project: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize project: {0}")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    File(#[from] FileOpError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No saved project!")]
    NoSavedProject,
    #[error("Unknown example: {0}")]
    UnknownExample(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("entry file `{0}` is not a valid file name")]
    InvalidEntryFile(String),
}

/// Failure reported by the external transform. `message` is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
