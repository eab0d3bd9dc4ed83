use super::client::GatewayClient;
use super::GatewayError;
use crate::crypto::{wrap_session_key, AesSessionMaterial};

/// Artifacts of one per-call hybrid handshake: fresh AES session material
/// plus the RSA-wrapped key that travels in the `ENC-KEY` header.
///
/// Each outbound gateway call is a self-contained authenticated transaction,
/// so a handshake is established per call and never shared between calls.
pub struct SessionHandshake {
    pub material: AesSessionMaterial,
    pub wrapped_key: String,
}

impl SessionHandshake {
    pub fn establish(client: &GatewayClient) -> Result<Self, GatewayError> {
        let public_key = client.fetch_public_key()?;
        let material = AesSessionMaterial::generate();
        let wrapped_key = wrap_session_key(&public_key, &material)?;

        Ok(Self {
            material,
            wrapped_key,
        })
    }
}
