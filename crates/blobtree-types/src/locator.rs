//! Connection descriptor decoding.
//!
//! A blob storage URI has the shape
//! `crate://<credentials>@<host>[:<port>]/<bucket>[?ssl=true]`. Decoding it
//! yields the bucket (namespace) and a plain `http`/`https` endpoint URL that
//! the HTTP client can dial. Decoding is pure, so it is used both to validate
//! configuration eagerly and to derive the endpoint actually contacted.

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::LocatorError;

/// URI scheme designating a blob storage connection descriptor.
pub const SCHEME: &str = "crate";

/// Query flag selecting a TLS endpoint.
const SSL_FLAG: &str = "ssl";

/// A decoded connection descriptor.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    namespace: String,
    endpoint: Url,
    /// Percent-decoded user name, if any.
    username: Option<String>,
    /// Percent-decoded password, if any.
    password: Option<String>,
}

impl Locator {
    /// Decode a connection descriptor.
    pub fn parse(uri: &str) -> Result<Self, LocatorError> {
        decode(uri)
    }

    /// The bucket name distinguishing object stores on the same endpoint.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The reconstructed `http`/`https` endpoint, credentials included
    /// in their percent-encoded form.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The endpoint with the password removed, for logs and cache keys.
    pub fn redacted_endpoint(&self) -> Url {
        let mut endpoint = self.endpoint.clone();
        if endpoint.password().is_some() {
            // Only fails for cannot-be-a-base URLs, which `decode` never builds.
            let _ = endpoint.set_password(None);
        }
        endpoint
    }

    /// The user name to authenticate as, percent-decoded.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password to authenticate with, percent-decoded.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns `true` if the endpoint uses TLS.
    pub fn is_secure(&self) -> bool {
        self.endpoint.scheme() == "https"
    }

    /// Cache key for clients talking to this bucket.
    pub fn cache_key(&self) -> String {
        format!("{}#{}", self.redacted_endpoint(), self.namespace)
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("namespace", &self.namespace)
            .field("endpoint", &self.redacted_endpoint().as_str())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (bucket {})", self.redacted_endpoint(), self.namespace)
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Decode a connection descriptor into its namespace and endpoint URL.
///
/// # Examples
///
/// ```
/// use blobtree_types::decode;
///
/// let locator = decode("crate://example.org/bucket-foo?ssl=true").unwrap();
/// assert_eq!(locator.namespace(), "bucket-foo");
/// assert_eq!(locator.endpoint().as_str(), "https://example.org/");
///
/// assert!(decode("http://example.org/bucket").is_err());
/// assert!(decode("crate://example.org").is_err());
/// ```
pub fn decode(uri: &str) -> Result<Locator, LocatorError> {
    let parsed = Url::parse(uri).map_err(|e| LocatorError::Malformed {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.scheme() != SCHEME {
        return Err(LocatorError::WrongScheme {
            uri: uri.to_string(),
            expected: SCHEME,
        });
    }

    let namespace = percent_decoded(uri, parsed.path().trim_matches('/'))?;
    if namespace.is_empty() {
        return Err(LocatorError::MissingNamespace(uri.to_string()));
    }
    if namespace.contains('/') {
        return Err(LocatorError::Malformed {
            uri: uri.to_string(),
            reason: format!("bucket name {namespace:?} must be a single path segment"),
        });
    }

    let username = match parsed.username() {
        "" => None,
        raw => Some(percent_decoded(uri, raw)?),
    };
    let password = parsed
        .password()
        .map(|raw| percent_decoded(uri, raw))
        .transpose()?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(LocatorError::MissingHost(uri.to_string())),
    };

    let secure = parsed
        .query_pairs()
        .any(|(key, value)| key == SSL_FLAG && is_enabled(&value));
    let scheme = if secure { "https" } else { "http" };

    let mut rebuilt = format!("{scheme}://");
    if !parsed.username().is_empty() {
        rebuilt.push_str(parsed.username());
        if let Some(password) = parsed.password() {
            rebuilt.push(':');
            rebuilt.push_str(password);
        }
        rebuilt.push('@');
    }
    rebuilt.push_str(host);
    if let Some(port) = parsed.port() {
        rebuilt.push_str(&format!(":{port}"));
    }
    rebuilt.push('/');

    let mut endpoint = Url::parse(&rebuilt).map_err(|e| LocatorError::Malformed {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    // Keep unrelated query parameters; only the transport flag is consumed.
    let remaining: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != SSL_FLAG)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if !remaining.is_empty() {
        endpoint.query_pairs_mut().extend_pairs(remaining);
    }

    Ok(Locator {
        namespace,
        endpoint,
        username,
        password,
    })
}

fn percent_decoded(uri: &str, raw: &str) -> Result<String, LocatorError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| LocatorError::Malformed {
            uri: uri.to_string(),
            reason: format!("invalid UTF-8 after percent-decoding: {e}"),
        })
}

fn is_enabled(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
