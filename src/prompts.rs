//! Versioned prompt registry
//!
//! The instructions sent to the remote model are the behavior of this service, so they
//! live here as data with a stable id, a version, and a checksum of the template text.
//! Transport code only ever asks the registry for a prompt by id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const FACTORS_SYSTEM: &str = "factors-system-v1";
pub const FACTORS_USER: &str = "factors-user-v1";
pub const RECOMMEND_SYSTEM: &str = "recommend-system-v1";
pub const RECOMMEND_USER: &str = "recommend-user-v1";

/// Core prompt definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Stable identifier (format: purpose-role-vN)
    pub id: String,
    /// Short one-liner description
    pub one_liner: String,
    pub version: String,
    /// SHA1 checksum of the template text
    pub checksum: String,
    /// Template text; `{{name}}` marks a placeholder
    pub template: String,
}

impl Prompt {
    pub fn new(
        id: impl Into<String>,
        one_liner: impl Into<String>,
        version: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let template = template.into();
        let checksum = sha1_checksum(&template);

        Self {
            id: id.into(),
            one_liner: one_liner.into(),
            version: version.into(),
            checksum,
            template,
        }
    }

    /// Substitute `{{key}}` placeholders. Unknown placeholders are left in place.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.template.clone();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{}}}}}", key), value);
        }
        out
    }
}

/// Generate a SHA1 checksum of prompt content
fn sha1_checksum(content: &str) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Registry of all known prompts
#[derive(Debug, Default)]
pub struct PromptRegistry {
    prompts: HashMap<String, Arc<Prompt>>,
}

impl PromptRegistry {
    /// Create new registry with core prompts
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_core_prompts();
        registry
    }

    pub fn register(&mut self, prompt: Prompt) {
        self.prompts.insert(prompt.id.clone(), Arc::new(prompt));
    }

    pub fn get(&self, id: &str) -> Option<Arc<Prompt>> {
        self.prompts.get(id).cloned()
    }

    pub fn list(&self) -> Vec<Arc<Prompt>> {
        let mut all: Vec<_> = self.prompts.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn register_core_prompts(&mut self) {
        self.register(Prompt::new(
            FACTORS_SYSTEM,
            "Identify five personal decision factors as JSON",
            "1.0.0",
            "You are a wise decision-making assistant. For any decision question, identify exactly 5 key factors that matter most to the person. Make each factor conversational and personal, like 'Your Daily Time Availability' or 'Your Living Space Setup'. For each factor, provide two realistic options that describe different preferences or situations. Return ONLY valid JSON in this format: {\"factors\": [{\"name\": \"Your Factor Name\", \"options\": [\"Option A description\", \"Option B description\"]}]}. Make it feel like a friendly conversation, not a formal analysis.",
        ));

        self.register(Prompt::new(
            FACTORS_USER,
            "Decision question as user turn",
            "1.0.0",
            "Decision: {{question}}",
        ));

        self.register(Prompt::new(
            RECOMMEND_SYSTEM,
            "Short, friendly recommendation from the chosen options",
            "1.0.0",
            "You are a wise, friendly advisor. Based on the person's choices, give a clear, conversational recommendation. Start with a brief recommendation (like 'Adopt a cat' or 'Choose option A'), then explain why this fits their situation in 2-3 sentences. Be encouraging and understanding, like talking to a friend. Keep it under 100 words total.",
        ));

        self.register(Prompt::new(
            RECOMMEND_USER,
            "Decision question plus selections as user turn",
            "1.0.0",
            "Decision: {{question}}. Choices: {{selections}}",
        ));
    }
}
