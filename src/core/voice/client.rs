//! REST client for creating voice-AI sessions.
//!
//! The client only models the call-creation exchange: build the request,
//! post it with API-key auth, validate that the response carries a usable
//! join URL. The realtime connection to that URL lives in [`super::relay`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::call::{Call, CallRequest};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.ultravox.ai/api";

/// Default request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the call-creation client.
#[derive(Debug, Error)]
pub enum VoiceClientError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned non-success status: {0}")]
    Status(reqwest::StatusCode),

    #[error("API did not return a valid join URL")]
    MissingJoinUrl,

    #[error("invalid join URL {url:?}: {reason}")]
    InvalidJoinUrl { url: String, reason: String },
}

/// Result type for voice client operations.
pub type VoiceClientResult<T> = Result<T, VoiceClientError>;

/// Configuration for [`VoiceClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceClientConfig {
    /// API key sent in the `X-API-Key` header.
    pub api_key: String,

    /// Base URL for API requests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for HTTP requests in seconds.
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

impl Default for VoiceClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            http_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Client for the voice-AI REST API.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    config: VoiceClientConfig,
    http: reqwest::Client,
}

impl VoiceClient {
    pub fn new(config: VoiceClientConfig) -> VoiceClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| VoiceClientError::ClientBuild(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// Create a new call and return its metadata, including the join URL for
    /// the realtime connection.
    pub async fn create_call(&self, request: &CallRequest) -> VoiceClientResult<Call> {
        if self.config.api_key.is_empty() {
            return Err(VoiceClientError::MissingApiKey);
        }

        let mut builder = self
            .http
            .post(self.call_url(request))
            .header("X-API-Key", &self.config.api_key)
            .json(request);

        if request.enable_greeting_prompt {
            builder = builder.query(&[("enableGreetingPrompt", "true")]);
        }
        if let Some(prior_call_id) = &request.prior_call_id {
            builder = builder.query(&[("priorCallId", prior_call_id.as_str())]);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VoiceClientError::Status(status));
        }

        let call: Call = response.json().await?;
        if call.join_url.is_empty() {
            return Err(VoiceClientError::MissingJoinUrl);
        }
        Url::parse(&call.join_url).map_err(|e| VoiceClientError::InvalidJoinUrl {
            url: call.join_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(call)
    }

    /// Create a call against a specific agent's endpoint.
    pub async fn create_agent_call(
        &self,
        agent_id: &str,
        request: &CallRequest,
    ) -> VoiceClientResult<Call> {
        let request = request.clone().agent(agent_id);
        self.create_call(&request).await
    }

    /// The endpoint for creating a call: agent-scoped when the request names
    /// an agent, the default calls collection otherwise.
    fn call_url(&self, request: &CallRequest) -> String {
        match &request.agent_id {
            Some(agent_id) => format!("{}/agents/{}/calls", self.config.base_url, agent_id),
            None => format!("{}/calls", self.config.base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_url_default_endpoint() {
        let client = VoiceClient::new(VoiceClientConfig {
            api_key: "key".to_string(),
            base_url: "https://api.example.com/api".to_string(),
            ..Default::default()
        })
        .unwrap();
        let request = CallRequest::new();
        assert_eq!(
            client.call_url(&request),
            "https://api.example.com/api/calls"
        );
    }

    #[test]
    fn test_call_url_agent_scoped() {
        let client = VoiceClient::new(VoiceClientConfig {
            api_key: "key".to_string(),
            base_url: "https://api.example.com/api".to_string(),
            ..Default::default()
        })
        .unwrap();
        let request = CallRequest::new().agent("agent-7");
        assert_eq!(
            client.call_url(&request),
            "https://api.example.com/api/agents/agent-7/calls"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected_before_any_request() {
        let client = VoiceClient::new(VoiceClientConfig::default()).unwrap();
        match client.create_call(&CallRequest::new()).await {
            Err(VoiceClientError::MissingApiKey) => {}
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }
}
