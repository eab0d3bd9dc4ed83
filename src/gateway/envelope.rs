use serde_json::Value;

use super::GatewayError;

/// Status discriminator value the gateway uses for a successful data call.
pub const STATUS_OK: &str = "OK";

/// Status discriminator value for an explicit business rejection.
pub const STATUS_ERROR: &str = "Error";

/// How strictly a response's status discriminator is judged.
///
/// The gateway's envelopes are asymmetric: data endpoints always carry
/// `Status: "OK"` on success, while the identity-auth endpoint may omit
/// `Status` entirely and only sets it to `"Error"` on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Anything other than `Status: "OK"` is a business error.
    RequireOk,
    /// Only `Status: "Error"` is a business error; absent status is success.
    RejectError,
}

/// The generic success/error wire wrapper returned by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayEnvelope {
    raw: Value,
}

impl GatewayEnvelope {
    /// Parse a response body. An empty body or non-object JSON is always a
    /// protocol error regardless of HTTP status.
    pub fn parse(body: &str) -> Result<Self, GatewayError> {
        if body.trim().is_empty() {
            return Err(GatewayError::Protocol("empty response body".into()));
        }

        let raw: Value = serde_json::from_str(body)
            .map_err(|e| GatewayError::Protocol(format!("invalid JSON body: {e}")))?;

        if !raw.is_object() {
            return Err(GatewayError::Protocol(format!(
                "expected a JSON object, got {raw}"
            )));
        }

        Ok(Self { raw })
    }

    pub fn status(&self) -> Option<&str> {
        self.raw.get("Status").and_then(Value::as_str)
    }

    pub fn message(&self) -> Option<&str> {
        self.raw.get("Message").and_then(Value::as_str)
    }

    pub fn error_log(&self) -> Option<&str> {
        self.raw.get("ErrorLog").and_then(Value::as_str)
    }

    /// Top-level string field by its wire name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.raw.get(name).and_then(Value::as_str)
    }

    /// Nested result payload, present on some auth responses.
    pub fn result_data(&self) -> Option<&Value> {
        self.raw.get("ResultData").filter(|v| v.is_object())
    }

    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Classify the envelope under the given status policy.
    pub fn classify(&self, policy: StatusPolicy) -> Result<(), GatewayError> {
        let status = self.status();
        let failed = match policy {
            StatusPolicy::RequireOk => status != Some(STATUS_OK),
            StatusPolicy::RejectError => status == Some(STATUS_ERROR),
        };

        if failed {
            return Err(GatewayError::Business {
                status: status.unwrap_or("<missing>").to_string(),
                message: self.message().unwrap_or_default().to_string(),
                error_log: self.error_log().unwrap_or_default().to_string(),
            });
        }

        Ok(())
    }
}
