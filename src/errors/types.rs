//! Error type definitions for the favicon proxy
//!
//! Errors are split along the catch boundary of the resolution pipeline:
//! everything that can go wrong during a live favicon lookup is a
//! [`FetchError`] and is absorbed by the placeholder tier, while
//! [`ResolveError`] covers the only failures a client can observe.

use thiserror::Error;

/// Failures during a live favicon fetch
///
/// These never reach the client. The orchestration layer catches them and
/// falls back to a generated placeholder icon.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failures (connect, TLS, timeout, body read)
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status from an icon download
    #[error("HTTP error: {status} from {url}")]
    Http { status: u16, url: String },

    /// A discovered `href` that cannot be resolved into a URL
    #[error("Invalid icon URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Icon bytes that do not decode, or a failed PNG re-encode
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Failures surfaced by the resolution pipeline itself
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The requested domain is not a syntactically valid hostname
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Placeholder PNG encoding failed; fatal to the current request only
    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),
}

impl FetchError {
    /// Create a transport error for a failed request to `url`
    pub fn transport<U: Into<String>>(url: U, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Create an HTTP status error
    pub fn http<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url<U: Into<String>>(url: U, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}
