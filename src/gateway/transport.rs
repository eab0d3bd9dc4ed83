use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::GatewayError;

/// HTTP transport seam for gateway traffic (allows mocking).
pub trait GatewayTransport {
    fn get(&self, url: &str) -> Result<String, GatewayError>;

    /// POST a JSON body with the gateway's identity headers. `enc_key` is the
    /// RSA-wrapped AES session key for this one call.
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        enc_key: &str,
        body: &Value,
    ) -> Result<String, GatewayError>;
}

/// Blocking reqwest transport with independent connect and request timeouts.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

fn map_request_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Unavailable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        GatewayError::Unavailable(format!("connection failed: {e}"))
    } else {
        GatewayError::Unavailable(e.to_string())
    }
}

impl GatewayTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, GatewayError> {
        let response = self.client.get(url).send().map_err(map_request_error)?;
        tracing::debug!(status = %response.status(), "gateway GET completed");
        response.text().map_err(map_request_error)
    }

    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        enc_key: &str,
        body: &Value,
    ) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(url)
            .header("API-KEY", api_key)
            .header("ENC-KEY", enc_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .map_err(map_request_error)?;

        tracing::debug!(status = %response.status(), "gateway POST completed");
        response.text().map_err(map_request_error)
    }
}

/// One recorded POST made through a [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub api_key: String,
    pub enc_key: String,
    pub body: Value,
}

/// Scripted reply for a mock POST.
pub enum MockReply {
    Body(String),
    Unavailable(String),
}

/// Mock transport for testing — serves a fixed public-key body on GET and a
/// scripted queue of replies on POST, recording every interaction.
pub struct MockTransport {
    get_body: String,
    replies: Mutex<VecDeque<MockReply>>,
    get_count: AtomicUsize,
    posts: Mutex<Vec<RecordedPost>>,
}

impl MockTransport {
    pub fn new(get_body: &str) -> Self {
        Self {
            get_body: get_body.to_string(),
            replies: Mutex::new(VecDeque::new()),
            get_count: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }
}

impl GatewayTransport for MockTransport {
    fn get(&self, _url: &str) -> Result<String, GatewayError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.get_body.clone())
    }

    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        enc_key: &str,
        body: &Value,
    ) -> Result<String, GatewayError> {
        self.posts.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            api_key: api_key.to_string(),
            enc_key: enc_key.to_string(),
            body: body.clone(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Body(body)) => Ok(body),
            Some(MockReply::Unavailable(reason)) => Err(GatewayError::Unavailable(reason)),
            None => Err(GatewayError::Unavailable("no scripted reply".into())),
        }
    }
}
