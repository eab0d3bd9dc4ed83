//! Secure gateway client and orchestration pipeline: hybrid-encrypted
//! identity authentication against a health-data gateway, dependent-call
//! aggregation of checkup and medication history, and contract-constrained
//! inference of probable underlying conditions from prescription patterns.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod gateway;
pub mod health;
pub mod inference;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedding binaries and integration harnesses.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("healthlink=info")),
        )
        .try_init();
}
