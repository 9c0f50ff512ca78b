//! Azure OpenAI chat-completions client for rationale requests.
//!
//! One request per call: no retries, no caching. The request is bounded by
//! the configured timeout, and every failure mode comes back as a
//! [`RationaleError`] for the caller to report.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ChatMessage, RationaleError, RationaleInputs};

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Deployment settings for an Azure OpenAI resource.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_key: String,
    /// Deployment (model) name.
    pub deployment: String,
    pub api_version: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl AzureConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full chat-completions URL for this deployment.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    fn validate(&self) -> Result<(), RationaleError> {
        for (name, value) in [
            ("endpoint", &self.endpoint),
            ("api key", &self.api_key),
            ("deployment", &self.deployment),
            ("api version", &self.api_version),
        ] {
            if value.trim().is_empty() {
                return Err(RationaleError::Config(format!("{name} is not set")));
            }
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RationaleError::Config(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.timeout.is_zero() {
            return Err(RationaleError::Config("timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// A generated rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    /// Completion text, verbatim.
    pub text: String,
    pub deployment: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for rationale requests against one Azure OpenAI deployment.
pub struct RationaleClient {
    client: reqwest::Client,
    config: AzureConfig,
}

impl RationaleClient {
    pub fn new(config: AzureConfig) -> Result<Self, RationaleError> {
        config.validate()?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Request a rationale for `inputs`.
    ///
    /// Missing inputs are rejected before any network activity.
    pub async fn explain(&self, inputs: &RationaleInputs) -> Result<Rationale, RationaleError> {
        let messages = inputs.messages()?;
        let url = self.config.completions_url();

        info!(
            deployment = %self.config.deployment,
            model_pred = inputs.model_pred.as_deref().unwrap_or_default(),
            "requesting rationale"
        );
        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&ChatRequest {
                messages: &messages,
                temperature: self.config.temperature,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RationaleError::Server {
                status: status.as_u16(),
                body,
            });
        }
        debug!(bytes = body.len(), "completion received");

        let text = completion_text(&body)?;
        info!(chars = text.len(), "rationale generated");
        Ok(Rationale {
            text,
            deployment: self.config.deployment.clone(),
            generated_at: Utc::now(),
        })
    }
}

/// First choice's message content from a chat-completions response body.
fn completion_text(body: &str) -> Result<String, RationaleError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(RationaleError::EmptyCompletion)
}
