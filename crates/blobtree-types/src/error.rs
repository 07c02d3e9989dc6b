use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors produced while decoding a connection descriptor.
///
/// Every variant carries the offending descriptor so that configuration
/// mistakes can be traced back to their source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("not a blob storage URI (expected scheme `{expected}`): {uri}")]
    WrongScheme { uri: String, expected: &'static str },

    #[error("bucket name missing in blob storage URI: {0}")]
    MissingNamespace(String),

    #[error("host missing in blob storage URI: {0}")]
    MissingHost(String),

    #[error("malformed blob storage URI {uri}: {reason}")]
    Malformed { uri: String, reason: String },
}
