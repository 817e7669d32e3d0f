//! OpenAI-compatible chat-completions client (Groq by default)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::Instrument;

use super::traits::ChatModel;
use crate::config::ModelConfig;
use crate::error::{DecisionError, RemoteCallError, Result};

#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl ChatCompletionsClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DecisionError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> RemoteCallError {
        if err.is_timeout() {
            RemoteCallError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            RemoteCallError::Transport(err.to_string())
        }
    }

    async fn send(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, RemoteCallError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RemoteCallError::MissingCredential)?;

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ]
        });

        tracing::info!("Making API call to {}", self.api_url);
        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        tracing::info!("API response status: {}", status.as_u16());
        if status.as_u16() != 200 {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let val: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                RemoteCallError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                RemoteCallError::Envelope(e.to_string())
            }
        })?;
        first_choice_content(&val)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions envelope.
pub fn first_choice_content(envelope: &Value) -> std::result::Result<String, RemoteCallError> {
    let choices = envelope
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| RemoteCallError::Envelope("no choices in response".to_string()))?;
    let first = choices
        .first()
        .ok_or_else(|| RemoteCallError::Envelope("empty choices array".to_string()))?;
    first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| RemoteCallError::Envelope("choice has no message content".to_string()))
}

#[async_trait]
impl ChatModel for ChatCompletionsClient {
    async fn call(
        &self,
        prompt_id: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, RemoteCallError> {
        let span = tracing::info_span!(
            "model_call",
            call_id = %uuid::Uuid::new_v4(),
            prompt_id = %prompt_id,
            model = %self.model
        );
        async {
            let started = std::time::Instant::now();
            let outcome = self.send(system_prompt, user_prompt).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &outcome {
                Ok(content) => {
                    tracing::info!(elapsed_ms, "model call succeeded");
                    tracing::debug!("AI response content: {}", content);
                }
                Err(e) => tracing::warn!(elapsed_ms, "model call failed: {}", e),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
