use thiserror::Error;

/// Unified error type for standalone-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field(s) for {classification} build: {}", .fields.join(", "))]
    MissingFields {
        classification: String,
        fields: Vec<&'static str>,
    },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error(
        "Requested {package} version '{requested}' was not found on the registry. \
         Available versions (newest first): {}",
        .available.join(", ")
    )]
    VersionNotFound {
        package: String,
        requested: String,
        available: Vec<String>,
    },

    #[error("Unable to determine latest {0} release from the registry response")]
    NoLatestVersion(String),

    #[error("Failed to query package registry: {0}")]
    RegistryUnreachable(String),

    #[error("Failed to query release listing: {0}")]
    ReleaseListingUnreachable(String),

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error(
        "No build number left for {variant} {key}: the highest existing build is {}",
        u64::MAX
    )]
    BuildNumberExhausted { variant: String, key: String },

    #[error("Packaging failed: {0}")]
    Package(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in standalone-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a packaging error with context
    pub fn package(msg: impl Into<String>) -> Self {
        ReleaseError::Package(msg.into())
    }

    /// Create a malformed-response error for the given endpoint
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// True for conditions caused by the network or a remote service
    /// rather than by the caller's input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ReleaseError::RegistryUnreachable(_)
                | ReleaseError::ReleaseListingUnreachable(_)
                | ReleaseError::MalformedResponse { .. }
        )
    }
}
