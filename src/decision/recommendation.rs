use std::sync::Arc;

use serde_json::Value;

use crate::clients::ChatModel;
use crate::decision::FALLBACK_RECOMMENDATION;
use crate::error::{DecisionError, Result};
use crate::prompts::{Prompt, PromptRegistry, RECOMMEND_SYSTEM, RECOMMEND_USER};

/// Turns a question and the user's picks into a short free-text recommendation.
#[derive(Clone)]
pub struct RecommendationGenerator {
    model: Arc<dyn ChatModel>,
    system: Arc<Prompt>,
    user: Arc<Prompt>,
}

impl RecommendationGenerator {
    pub fn new(model: Arc<dyn ChatModel>, prompts: &PromptRegistry) -> Result<Self> {
        let lookup = |id: &str| {
            prompts.get(id).ok_or_else(|| DecisionError::Config {
                message: format!("prompt '{}' not registered", id),
            })
        };
        Ok(Self {
            model,
            system: lookup(RECOMMEND_SYSTEM)?,
            user: lookup(RECOMMEND_USER)?,
        })
    }

    /// Model text verbatim, or [`FALLBACK_RECOMMENDATION`] on any failure.
    pub async fn recommend(&self, question: &str, selections: &Value) -> String {
        let selections_text = selections.to_string();
        let user_prompt = self.user.render(&[
            ("question", question),
            ("selections", selections_text.as_str()),
        ]);

        match self
            .model
            .call(&self.system.id, &self.system.template, &user_prompt)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Recommendation failed ({}), using fallback sentence", e);
                FALLBACK_RECOMMENDATION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteCallError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        reply: Mutex<Option<std::result::Result<String, RemoteCallError>>>,
        last_call: Mutex<Option<(String, String)>>,
    }

    #[async_trait]
    impl ChatModel for Scripted {
        async fn call(
            &self,
            prompt_id: &str,
            _system_prompt: &str,
            user_prompt: &str,
        ) -> std::result::Result<String, RemoteCallError> {
            *self.last_call.lock().unwrap() = Some((prompt_id.to_string(), user_prompt.to_string()));
            self.reply.lock().unwrap().take().expect("called once")
        }
    }

    fn generator(
        reply: std::result::Result<String, RemoteCallError>,
    ) -> (Arc<Scripted>, RecommendationGenerator) {
        let model = Arc::new(Scripted {
            reply: Mutex::new(Some(reply)),
            last_call: Mutex::new(None),
        });
        let generator = RecommendationGenerator::new(model.clone(), &PromptRegistry::new()).unwrap();
        (model, generator)
    }

    #[tokio::test]
    async fn success_is_returned_unmodified() {
        let text = "```\nAdopt a cat. Cats suit small spaces.\n```\n";
        let (_, generator) = generator(Ok(text.to_string()));
        let out = generator.recommend("Dog or cat?", &json!({})).await;
        assert_eq!(out, text);
    }

    #[tokio::test]
    async fn user_turn_concatenates_question_and_selections() {
        let (model, generator) = generator(Ok("Adopt a cat.".into()));
        let selections = json!({"Your Living Space": "I live in a smaller space with limited options"});
        generator
            .recommend("Should I get a dog or a cat?", &selections)
            .await;
        let (prompt_id, user) = model.last_call.lock().unwrap().clone().unwrap();
        assert_eq!(prompt_id, RECOMMEND_SYSTEM);
        assert_eq!(
            user,
            r#"Decision: Should I get a dog or a cat?. Choices: {"Your Living Space":"I live in a smaller space with limited options"}"#
        );
    }

    #[tokio::test]
    async fn missing_choices_uses_fallback_sentence() {
        let (_, generator) = generator(Err(RemoteCallError::Envelope(
            "no choices in response".into(),
        )));
        let out = generator.recommend("q", &Value::Null).await;
        assert_eq!(out, FALLBACK_RECOMMENDATION);
    }

    #[tokio::test]
    async fn every_failure_kind_uses_fallback_sentence() {
        let failures = vec![
            RemoteCallError::MissingCredential,
            RemoteCallError::Timeout { timeout_ms: 30_000 },
            RemoteCallError::Transport("connection refused".into()),
            RemoteCallError::Status {
                status: 429,
                body: "rate limited".into(),
            },
            RemoteCallError::Envelope("empty choices array".into()),
        ];
        for failure in failures {
            let label = failure.to_string();
            let (_, generator) = generator(Err(failure));
            let out = generator
                .recommend("Dog or cat?", &json!({"Your Schedule": "Away"}))
                .await;
            assert_eq!(out, FALLBACK_RECOMMENDATION, "{label}");
        }
    }
}
