//! Error types for marketplace fetching and repository-key lookup.

use thiserror::Error;

/// Coarse category of a failure, as reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request failed, returned non-2xx, or its worker task died.
    Network,
    /// Body was not valid JSON or lacked an expected field.
    Parse,
    /// Catalog entry had no usable `owner/repo@ref` url.
    Lookup,
}

/// Errors raised while fetching the snapshot id, download index, or catalogs.
#[derive(Debug, Error)]
pub enum BazaarError {
    #[error("invalid endpoint URL {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {code}")]
    HttpStatus { url: String, code: u32 },

    #[error("fetch task for {url} did not complete: {source}")]
    Task {
        url: String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} has no `{field}` field")]
    MissingField { url: String, field: &'static str },

    #[error("response from {url} has an unusable snapshot hash {hash:?}")]
    InvalidSnapshot { url: String, hash: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl BazaarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BazaarError::InvalidEndpoint { .. }
            | BazaarError::Network { .. }
            | BazaarError::HttpStatus { .. }
            | BazaarError::Task { .. } => ErrorKind::Network,
            BazaarError::Parse { .. }
            | BazaarError::MissingField { .. }
            | BazaarError::InvalidSnapshot { .. } => ErrorKind::Parse,
            BazaarError::Lookup(_) => ErrorKind::Lookup,
        }
    }
}

/// A catalog entry whose `url` cannot be split into `owner/repo@ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("entry has no url")]
    MissingUrl,

    #[error("url {0:?} has no `@ref` suffix")]
    MissingRef(String),

    #[error("repository key in {0:?} is not `owner/repo`")]
    MalformedKey(String),
}
