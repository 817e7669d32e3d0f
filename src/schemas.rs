//! Data shapes exchanged with the browser and with the remote model

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FACTOR_COUNT: usize = 5;

/// One dimension of a decision with two contrasting options.
/// `options[0]` is the first choice, `options[1]` the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFactor {
    pub name: String,
    pub options: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSet {
    pub factors: Vec<DecisionFactor>,
}

impl FactorSet {
    /// Decode JSON text as a factor set and report how it deviates from the expected shape.
    /// Used for diagnostics only; callers never alter model output based on this.
    pub fn shape_problems(text: &str) -> Vec<String> {
        match serde_json::from_str::<FactorSet>(text) {
            Ok(set) if set.factors.len() == FACTOR_COUNT => Vec::new(),
            Ok(set) => vec![format!(
                "expected {} factors, got {}",
                FACTOR_COUNT,
                set.factors.len()
            )],
            Err(e) => vec![e.to_string()],
        }
    }
}

/// Body of `POST /get_factors`
#[derive(Debug, Clone, Deserialize)]
pub struct FactorsRequest {
    pub question: String,
}

/// Response of `POST /get_factors`. `factors` is JSON text, not a nested object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorsResponse {
    pub factors: String,
}

/// Body of `POST /get_recommendation`. Selections are opaque client data.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub question: String,
    #[serde(default)]
    pub selections: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: String,
}
