pub mod chat;
pub mod extract;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use chat::*;
pub use extract::*;
pub use parser::*;
pub use pipeline::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

/// Failures of the inference collaborator or its output handling. These are
/// reported as a degraded [`types::DiagnosisReport`], never thrown across the
/// pipeline boundary.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Chat API key is not configured")]
    MissingApiKey,

    #[error("Chat service unreachable: {0}")]
    Connection(String),

    #[error("Chat API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Chat response contained no choices")]
    EmptyResponse,

    #[error("Malformed chat response: {0}")]
    ResponseParsing(String),

    #[error("Diagnosis array parsing failed: {0}")]
    JsonParsing(String),
}
