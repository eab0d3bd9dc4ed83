use serde_json::{json, Value};

use super::types::{tag_encrypted, IdentityFields, SessionCredential};
use crate::crypto::AesSessionMaterial;
use crate::gateway::{GatewayClient, GatewayEnvelope, GatewayError, SessionHandshake, StatusPolicy};

pub const SIMPLE_AUTH_PATH: &str = "/api/v1.0/nhissimpleauth/simpleauthrequest";

/// Auth-type discriminator sent in plaintext; `"0"` selects simple auth.
const PRIVATE_AUTH_TYPE: &str = "0";

/// Lifecycle of one identity handshake. Terminal on `Authenticated` or
/// `Failed`; a fresh orchestrator is expected per request chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    HandshakePending,
    Authenticated,
    Failed,
}

/// Drives the identity handshake: per-call hybrid encryption of the personal
/// fields, the gateway auth call, and normalization of the response into an
/// opaque [`SessionCredential`].
pub struct AuthOrchestrator {
    client: GatewayClient,
    state: AuthState,
}

impl AuthOrchestrator {
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Authenticate the person and return the normalized session credential.
    /// Handshake failure is fatal to the request: every error propagates.
    pub fn request_identity_auth(
        &mut self,
        fields: &IdentityFields,
    ) -> Result<SessionCredential, GatewayError> {
        let _span = tracing::info_span!("identity_auth").entered();
        self.state = AuthState::HandshakePending;

        match self.call_auth_endpoint(fields) {
            Ok(envelope) => match credential_from_envelope(&envelope) {
                Ok(credential) => {
                    self.state = AuthState::Authenticated;
                    tracing::info!("identity handshake completed");
                    Ok(credential)
                }
                Err(e) => {
                    self.state = AuthState::Failed;
                    tracing::warn!(error = %e, "auth response validation failed");
                    Err(e)
                }
            },
            Err(e) => {
                self.state = AuthState::Failed;
                tracing::warn!(error = %e, "identity handshake failed");
                Err(e)
            }
        }
    }

    /// Diagnostic variant: same handshake and call, but the gateway JSON is
    /// returned untouched — no normalization, no validation, no `ENC:` tags.
    pub fn request_identity_auth_raw(
        &self,
        fields: &IdentityFields,
    ) -> Result<Value, GatewayError> {
        let _span = tracing::info_span!("identity_auth_raw").entered();
        self.call_auth_endpoint(fields).map(GatewayEnvelope::into_value)
    }

    fn call_auth_endpoint(
        &self,
        fields: &IdentityFields,
    ) -> Result<GatewayEnvelope, GatewayError> {
        let handshake = SessionHandshake::establish(&self.client)?;
        let body = auth_request_body(&handshake.material, fields);
        self.client.call(
            SIMPLE_AUTH_PATH,
            &body,
            &handshake.wrapped_key,
            StatusPolicy::RejectError,
        )
    }
}

/// Personal fields are encrypted individually under the call's session key;
/// the auth-type discriminator stays plaintext.
fn auth_request_body(material: &AesSessionMaterial, fields: &IdentityFields) -> Value {
    json!({
        "PrivateAuthType": PRIVATE_AUTH_TYPE,
        "UserName": material.encrypt_field(&fields.user_name),
        "BirthDate": material.encrypt_field(&fields.birth_date),
        "UserCellphoneNumber": material.encrypt_field(&fields.phone_number),
    })
}

/// Extract the identity/session fields from the envelope. Fields live at the
/// top level on most responses, with a nested `ResultData` object as
/// fallback; top-level values win when both are present.
fn credential_from_envelope(
    envelope: &GatewayEnvelope,
) -> Result<SessionCredential, GatewayError> {
    let pick = |name: &str| -> Option<String> {
        envelope
            .field(name)
            .or_else(|| {
                envelope
                    .result_data()
                    .and_then(|data| data.get(name))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
    };

    let cx_id = pick("CxId");
    let req_tx_id = pick("ReqTxId");
    let token = pick("Token");
    let tx_id = pick("TxId");

    for (name, value) in [
        ("ReqTxId", &req_tx_id),
        ("CxId", &cx_id),
        ("Token", &token),
        ("TxId", &tx_id),
    ] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(GatewayError::IncompleteCredential(format!(
                "auth response lacks {name}"
            )));
        }
    }

    Ok(SessionCredential {
        cx_id,
        private_auth_type: pick("PrivateAuthType"),
        req_tx_id,
        token,
        tx_id,
        user_name: tag_encrypted(pick("UserName")),
        birth_date: tag_encrypted(pick("BirthDate")),
        phone_number: tag_encrypted(pick("UserCellphoneNumber")),
    })
}
