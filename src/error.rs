use thiserror::Error;

/// The main Result type used throughout flowsample
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// One or both identity attributes are absent from the record.
    #[error("Missing attribute: has name: {has_name}; has email: {has_email}")]
    MissingAttribute { has_name: bool, has_email: bool },

    /// The lookup collaborator failed.
    #[error("Lookup failure: {0}")]
    LookupFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User-defined function errors
    #[error("User Defined error: {0}")]
    UserDefinedError(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ErrorKind {
    /// Names of the identity attributes that were absent, for a `MissingAttribute` error.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        match self {
            ErrorKind::MissingAttribute {
                has_name,
                has_email,
            } => {
                let mut missing = Vec::new();
                if !has_name {
                    missing.push(crate::enricher::ATTR_NAME);
                }
                if !has_email {
                    missing.push(crate::enricher::ATTR_EMAIL);
                }
                missing
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Enricher - {0}")]
    EnricherError(ErrorKind),

    #[error("Gateway - {0}")]
    GatewayError(ErrorKind),

    #[error("Lookup - {0}")]
    LookupError(ErrorKind),

    #[error("Service - {0}")]
    ServiceError(ErrorKind),

    #[error("Property - {0}")]
    PropertyError(ErrorKind),

    #[error("Flowsample - {0}")]
    DefaultError(ErrorKind),
}

impl Error {
    /// The underlying error kind, regardless of which component raised it.
    pub fn kind(&self) -> &ErrorKind {
        match self {
            Error::EnricherError(kind)
            | Error::GatewayError(kind)
            | Error::LookupError(kind)
            | Error::ServiceError(kind)
            | Error::PropertyError(kind)
            | Error::DefaultError(kind) => kind,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::DefaultError(ErrorKind::InternalError(format!("I/O error: {e}")))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DefaultError(ErrorKind::ConfigError(format!("invalid JSON: {e}")))
    }
}
