use blobtree_overlay::OverlayError;
use blobtree_store::StoreError;
use blobtree_types::LocatorError;

/// Errors from artifact repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The artifact URI could not be decoded.
    #[error("invalid artifact URI: {0}")]
    InvalidConfiguration(#[from] LocatorError),

    /// No repository is registered for the URI scheme.
    #[error("no artifact repository for scheme {0:?}")]
    UnsupportedScheme(String),

    /// The artifact path escapes the repository root.
    #[error("invalid artifact path {path:?}: {reason}")]
    InvalidArtifactPath { path: String, reason: &'static str },

    /// No artifact is stored at the path.
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// The overlay rejected the operation.
    #[error(transparent)]
    Overlay(OverlayError),

    /// The digest store failed; passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Local file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`RepoConfig`](crate::RepoConfig).
    #[error("invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<OverlayError> for RepoError {
    fn from(err: OverlayError) -> Self {
        match err {
            OverlayError::NotFound(path) => Self::NotFound(path),
            OverlayError::InvalidConfiguration(err) => Self::InvalidConfiguration(err),
            OverlayError::Store(err) => Self::Store(err),
            other => Self::Overlay(other),
        }
    }
}

/// Result alias for artifact repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
