use thiserror::Error;

/// Errors returned by the AvaTax client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AvaTaxError {
    /// Credentials or endpoint configuration are missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A request document failed client-side validation. Nothing was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// An argument could not be represented on the wire (e.g. NaN coordinates).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network-level failure: DNS, connection refused, reset, TLS.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with HTTP status >= 400 or an `Error` result code.
    #[error("AvaTax service error ({status}): {message}")]
    Service {
        /// HTTP status of the response.
        status: u16,
        /// First message summary from the response body, or a generic fallback.
        message: String,
    },
}

impl AvaTaxError {
    /// The validation failure, if this is a validation error.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status tag of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ValidationError> for AvaTaxError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Configuration errors. Raised synchronously, before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("credentials not supplied: username and password must be non-empty")]
    MissingCredentials,
    #[error("{0} environment variable is required")]
    MissingVar(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("invalid host {0}: {1}")]
    InvalidHost(String, String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the invalid field (e.g. "Lines[2].Qty").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Zero-based position of the offending entry within `Lines` or `Addresses`.
    pub index: Option<usize>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    /// Create a document-level validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            index: None,
        }
    }

    /// Create a validation error for the entry at `index` of a sequence.
    pub fn at(
        sequence: &str,
        index: usize,
        field: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: format!("{sequence}[{index}].{field}"),
            message: message.into(),
            index: Some(index),
        }
    }

    /// The entry at `index` as a whole is unusable, e.g. not an object.
    pub fn entry(sequence: &str, index: usize, message: impl Into<String>) -> Self {
        Self {
            field: format!("{sequence}[{index}]"),
            message: message.into(),
            index: Some(index),
        }
    }
}
