use std::sync::Arc;

use serde_json::Value;

use super::envelope::{GatewayEnvelope, StatusPolicy};
use super::transport::{GatewayTransport, HttpTransport};
use super::GatewayError;
use crate::config::GatewaySettings;

/// Issues authenticated calls to the identity/health-data gateway and decodes
/// its envelope. Every POST carries the API identity key and the RSA-wrapped
/// AES session key minted for that one call.
pub struct GatewayClient {
    transport: Arc<dyn GatewayTransport + Send + Sync>,
    settings: GatewaySettings,
}

impl GatewayClient {
    pub fn new(settings: GatewaySettings) -> Self {
        let transport = Arc::new(HttpTransport::new(
            settings.connect_timeout,
            settings.request_timeout,
        ));
        Self::with_transport(settings, transport)
    }

    pub fn with_transport(
        settings: GatewaySettings,
        transport: Arc<dyn GatewayTransport + Send + Sync>,
    ) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Fetch the gateway's RSA public key (base64 X.509 DER).
    pub fn fetch_public_key(&self) -> Result<String, GatewayError> {
        let url = format!(
            "{}/api/Auth/GetPublicKey?APIkey={}",
            self.settings.host, self.settings.api_key
        );

        let body = self.transport.get(&url)?;
        if body.trim().is_empty() {
            return Err(GatewayError::Protocol("empty public key response".into()));
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Protocol(format!("invalid public key response: {e}")))?;

        parsed
            .get("PublicKey")
            .and_then(Value::as_str)
            .filter(|key| !key.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Protocol("response lacks PublicKey field".into()))
    }

    /// POST a JSON body to a gateway endpoint and classify the envelope.
    pub fn call(
        &self,
        path: &str,
        body: &Value,
        enc_key: &str,
        policy: StatusPolicy,
    ) -> Result<GatewayEnvelope, GatewayError> {
        let url = format!("{}{}", self.settings.host, path);
        tracing::debug!(%url, "calling gateway endpoint");

        let text = self
            .transport
            .post_json(&url, &self.settings.api_key, enc_key, body)?;

        let envelope = GatewayEnvelope::parse(&text)?;
        envelope.classify(policy)?;
        Ok(envelope)
    }
}
