pub mod client;
pub mod envelope;
pub mod handshake;
pub mod transport;

#[cfg(test)]
pub(crate) mod testkit;

pub use client::*;
pub use envelope::*;
pub use handshake::*;
pub use transport::*;

use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network-level failure (connect, timeout, body read). Caller may retry.
    #[error("Gateway unreachable: {0}")]
    Unavailable(String),

    /// The gateway accepted the request but rejected it at the business
    /// level. Upstream message and log are carried verbatim; not retryable.
    #[error("Gateway rejected request (Status: {status}): {message}")]
    Business {
        status: String,
        message: String,
        error_log: String,
    },

    /// Malformed or unexpected envelope shape — contract drift, not retryable.
    #[error("Unexpected gateway response: {0}")]
    Protocol(String),

    /// A required session-identifying field is missing or blank. The caller
    /// must restart the identity handshake.
    #[error("Incomplete session credential: {0}")]
    IncompleteCredential(String),

    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),
}
