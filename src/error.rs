use thiserror::Error;

/// Application error types
///
/// Every message is meant to be printed as-is to an operator.
#[derive(Error, Debug)]
pub enum AppError {
    /// A mandatory variable of an integration is absent or empty
    #[error("\"{variable}\" variable not found in \"{section}\" config")]
    MissingVariable { variable: String, section: String },

    /// A mandatory subtree is absent
    #[error("No \"{0}\" key found")]
    MissingKey(String),

    /// A key set entry lacks one of its suffixes
    #[error("An environment variable suffixed with \"{suffix}\" must be defined with \"{id}\", like {variable}")]
    MissingKeyEntry {
        suffix: String,
        id: String,
        variable: String,
    },

    /// Tree lookup: node exists but carries no value
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// Tree lookup: no node at path
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Validation errors, reported verbatim
    #[error("{0}")]
    Validation(String),

    /// Runtime configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Body of a response could not be read
    #[error("can't read http response from {url}")]
    UnreadableResponse { url: String },

    /// Remote service answered with a non success status
    #[error("{url} returned status {status}")]
    Remote { url: String, status: u16 },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Whether the error happened while building components from configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::MissingVariable { .. }
                | AppError::MissingKey(_)
                | AppError::MissingKeyEntry { .. }
                | AppError::VariableNotFound(_)
                | AppError::NodeNotFound(_)
                | AppError::Validation(_)
                | AppError::Configuration(_)
        )
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
