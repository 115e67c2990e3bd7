//! CVP client errors

use thiserror::Error;

/// Errors that can occur when talking to the CVP transport layer
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server replied with a non-success status code
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code of the reply
        status: reqwest::StatusCode,
        /// Response body, as text
        body: String,
    },
}

/// Errors that can occur when interacting with the CVP inventory API
///
/// Every variant carries the name of the client method that originated it.
#[derive(Debug, Error)]
pub enum CvpError {
    /// The transport failed before a response body was obtained
    #[error("{method}: {source}")]
    Transport {
        /// Originating client method
        method: &'static str,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The response body did not match the expected JSON shape
    #[error("{method}: error decoding response body: {source}")]
    Decode {
        /// Originating client method
        method: &'static str,
        /// Underlying deserialization failure
        #[source]
        source: serde_json::Error,
    },

    /// The response decoded cleanly but its error envelope was populated
    #[error("{method}: CVP error {code}: {message}")]
    Server {
        /// Originating client method
        method: &'static str,
        /// Server-reported error code
        code: String,
        /// Server-reported error message
        message: String,
    },

    /// A lookup that the API contract defines as a hard error
    #[error("{method}: {message}")]
    NotFound {
        /// Originating client method
        method: &'static str,
        /// What was missing
        message: String,
    },
}
