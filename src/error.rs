//! Error taxonomy for DTM API calls.
//!
//! A call can fail in three distinguishable ways: the HTTP exchange itself
//! failed ([`Error::Transport`]), the server processed the request but
//! rejected it ([`Error::Rejected`]), or the body parsed as JSON without the
//! expected envelope ([`Error::Malformed`]). Every error is fatal to the
//! call; nothing is retried and no partial data is returned.

use thiserror::Error;

/// Errors returned by [`DtmClient`](crate::DtmClient) calls.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request could not be completed: connection failure, timeout,
    /// or a non-2xx status. 4xx and 5xx are not distinguished.
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server accepted the request but reported failure in the response
    /// envelope. Carries the first entry of the server's error-message list
    /// verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The response envelope is missing an expected field. Names the absent
    /// field.
    #[error("malformed API response: missing `{0}` field")]
    Malformed(&'static str),
}
