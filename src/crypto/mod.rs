pub mod session;
pub mod wrap;

pub use session::*;
pub use wrap::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid gateway public key: {0}")]
    InvalidPublicKey(String),

    #[error("RSA session-key wrap failed: {0}")]
    RsaEncryption(String),
}
