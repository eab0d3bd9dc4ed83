use serde::{Deserialize, Serialize};

use crate::gateway::GatewayError;

/// Prefix marking a personal field as gateway-encrypted ciphertext. Tagged
/// values must never be treated as plaintext; only the gateway can decrypt
/// them. The marker is stripped before a field is re-encrypted for a
/// follow-up call.
pub const GATEWAY_ENC_MARKER: &str = "ENC:";

/// Plaintext identity fields supplied by the caller for the auth handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityFields {
    pub user_name: String,
    pub birth_date: String,
    pub phone_number: String,
}

/// Session credentials issued by the gateway after a successful identity
/// handshake. Held in memory for one request chain only, never persisted.
///
/// `user_name`, `birth_date` and `phone_number` carry the [`GATEWAY_ENC_MARKER`]
/// prefix: they remain gateway-encrypted ciphertext as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    #[serde(default)]
    pub cx_id: Option<String>,
    #[serde(default)]
    pub private_auth_type: Option<String>,
    #[serde(default)]
    pub req_tx_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub tx_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl SessionCredential {
    /// All four session-identifying fields must be present and non-blank
    /// before any data call may be attempted. Violation is a hard
    /// precondition failure, not a retryable condition.
    pub fn ensure_usable(&self) -> Result<(), GatewayError> {
        for (name, value) in [
            ("ReqTxId", &self.req_tx_id),
            ("CxId", &self.cx_id),
            ("Token", &self.token),
            ("TxId", &self.tx_id),
        ] {
            if is_blank(value) {
                return Err(GatewayError::IncompleteCredential(format!(
                    "{name} is missing; restart the identity handshake"
                )));
            }
        }
        Ok(())
    }

    /// A personal field with the gateway-encrypted marker stripped, ready for
    /// re-encryption under a fresh session key. Absent fields become `""`.
    pub fn stripped(value: &Option<String>) -> String {
        value
            .as_deref()
            .unwrap_or_default()
            .replace(GATEWAY_ENC_MARKER, "")
    }
}

/// Tag a gateway-encrypted value with the ciphertext marker.
pub(crate) fn tag_encrypted(value: Option<String>) -> Option<String> {
    value.map(|v| format!("{GATEWAY_ENC_MARKER}{v}"))
}
