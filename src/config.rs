use std::env;
use std::time::Duration;

/// Connection settings for the identity/health-data gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub host: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl GatewaySettings {
    pub fn new(host: &str, api_key: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            connect_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Read settings from the environment. `HEALTHLINK_GATEWAY_API_KEY` has
    /// no default; everything else falls back to production values.
    pub fn from_env() -> Self {
        let mut settings = Self::new(
            &env_or("HEALTHLINK_GATEWAY_HOST", "https://api.tilko.net"),
            &env_or("HEALTHLINK_GATEWAY_API_KEY", ""),
        );
        settings.connect_timeout =
            Duration::from_secs(env_u64("HEALTHLINK_GATEWAY_CONNECT_TIMEOUT_SECS", 60));
        settings.request_timeout =
            Duration::from_secs(env_u64("HEALTHLINK_GATEWAY_REQUEST_TIMEOUT_SECS", 60));
        settings
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new("https://gateway.test", "test-api-key")
    }
}

/// Settings for the chat-completion inference collaborator.
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl InferenceSettings {
    pub fn from_env() -> Self {
        Self {
            url: env_or(
                "HEALTHLINK_CHAT_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            api_key: env_or("HEALTHLINK_CHAT_API_KEY", ""),
            model: env_or("HEALTHLINK_CHAT_MODEL", "gpt-4o-mini"),
            max_tokens: env_u64("HEALTHLINK_CHAT_MAX_TOKENS", 1000) as u32,
            // Low temperature keeps the closed-vocabulary output stable.
            temperature: 0.3,
            request_timeout: Duration::from_secs(60),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            url: "https://chat.test/v1/chat/completions".into(),
            api_key: "test-chat-key".into(),
            model: "test-model".into(),
            max_tokens: 1000,
            temperature: 0.3,
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
