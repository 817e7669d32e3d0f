use std::sync::Arc;

use crate::clients::ChatModel;
use crate::decision::DEFAULT_FACTORS_JSON;
use crate::error::{DecisionError, Result};
use crate::prompts::{FACTORS_SYSTEM, FACTORS_USER, Prompt, PromptRegistry};
use crate::schemas::FactorSet;

/// Asks the model for five decision factors and returns its JSON text.
#[derive(Clone)]
pub struct FactorExtractor {
    model: Arc<dyn ChatModel>,
    system: Arc<Prompt>,
    user: Arc<Prompt>,
}

impl FactorExtractor {
    pub fn new(model: Arc<dyn ChatModel>, prompts: &PromptRegistry) -> Result<Self> {
        let lookup = |id: &str| {
            prompts.get(id).ok_or_else(|| DecisionError::Config {
                message: format!("prompt '{}' not registered", id),
            })
        };
        Ok(Self {
            model,
            system: lookup(FACTORS_SYSTEM)?,
            user: lookup(FACTORS_USER)?,
        })
    }

    /// Returns the model's JSON (fences removed) or [`DEFAULT_FACTORS_JSON`].
    ///
    /// The text is passed through as produced once it parses as JSON; its shape is
    /// only checked for logging.
    pub async fn extract(&self, question: &str) -> String {
        tracing::info!(prompt_id = %self.system.id, "Requesting factors for question: {}", question);
        let user_prompt = self.user.render(&[("question", question)]);

        let raw = match self
            .model
            .call(&self.system.id, &self.system.template, &user_prompt)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Factor extraction failed ({}), using default factors", e);
                return DEFAULT_FACTORS_JSON.to_string();
            }
        };

        let content = strip_fences(&raw);
        if let Err(e) = serde_json::from_str::<serde_json::Value>(content) {
            tracing::warn!("JSON parsing error: {}, using default factors", e);
            return DEFAULT_FACTORS_JSON.to_string();
        }

        let problems = FactorSet::shape_problems(content);
        if !problems.is_empty() {
            tracing::warn!("Model factors deviate from expected shape: {}", problems.join("; "));
        }
        tracing::debug!("Valid JSON found: {}", content);
        content.to_string()
    }
}

/// Remove a Markdown code fence and a leading `json` tag from model output.
pub fn strip_fences(raw: &str) -> &str {
    let mut content = raw.trim();
    if let Some(rest) = content.strip_prefix("```") {
        // Keep only the text up to the closing fence
        content = rest.split("```").next().unwrap_or(rest);
    }
    if let Some(rest) = content.strip_prefix("json") {
        content = rest;
    }
    content = content.trim();
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}
