use blobtree_types::Digest;

/// Errors from digest store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No payload is stored under the digest.
    #[error("blob not found: {0}")]
    NotFound(Digest),

    /// The store was used before `connect()` or after `disconnect()`.
    #[error("digest store is not connected")]
    NotConnected,

    /// The HTTP transport failed before a response was received.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an unexpected status code.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// A request URL could not be built from the endpoint.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
