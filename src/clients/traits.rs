use async_trait::async_trait;

use crate::error::RemoteCallError;

/// A single-shot chat-completion call: one system turn, one user turn, one answer.
///
/// Implementations make exactly one attempt and never retry. On success they return
/// the first choice's message content untouched. `prompt_id` names the registered
/// prompt the turns were rendered from and is only used for tracing.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn call(
        &self,
        prompt_id: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, RemoteCallError>;
}
