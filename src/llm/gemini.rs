use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::{LlmClient, LlmError, CHAT_MODEL};
use crate::config::Config;

/// Google Gemini `generateContent` client. One attempt per call.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::CallFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: CHAT_MODEL.to_string(),
        })
    }

    /// `Ok(None)` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, LlmError> {
        config
            .gemini_api_key
            .as_ref()
            .map(|key| Self::new(key.clone(), config.gemini_api_base.clone(), config.llm_timeout))
            .transpose()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(body: &Value) -> Result<String, LlmError> {
    if let Some(reason) = body
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        warn!("Gemini blocked the prompt. Reason: {}", reason);
        return Err(LlmError::CallFailed(format!("prompt blocked: {}", reason)));
    }

    let candidate = body
        .pointer("/candidates/0")
        .ok_or_else(|| LlmError::MalformedResponse("no candidates in response".to_string()))?;

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.get("finishReason").and_then(Value::as_str) {
        Some(reason) if reason != "STOP" => {
            warn!("Gemini generation stopped abnormally. Reason: {}", reason);
            Err(LlmError::CallFailed(format!("generation stopped: {}", reason)))
        }
        _ => Err(LlmError::MalformedResponse("candidate has no text".to_string())),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini network error: {:?}", e);
                LlmError::CallFailed(format!("network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, text);
            return Err(LlmError::CallFailed(format!("provider returned {}", status)));
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response JSON: {:?}", e);
            LlmError::MalformedResponse(e.to_string())
        })?;

        let text = extract_text(&body)?;
        info!(response_len = text.len(), "Received response from Gemini");
        Ok(text)
    }
}
