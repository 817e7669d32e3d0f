//! The two model-backed operations and the payloads they fall back to.
//!
//! Neither operation ever fails from the caller's point of view: any unsuccessful
//! remote call is replaced with a fixed payload defined once in this module.

pub mod factors;
pub mod recommendation;

pub use factors::{FactorExtractor, strip_fences};
pub use recommendation::RecommendationGenerator;

/// Returned by [`FactorExtractor::extract`] whenever the model cannot supply usable JSON.
pub const DEFAULT_FACTORS_JSON: &str = r#"{"factors": [{"name": "Your Time Availability", "options": ["I have several hours daily for active involvement", "I prefer minimal time commitment"]}, {"name": "Your Living Space", "options": ["I have plenty of space and outdoor access", "I live in a smaller space with limited options"]}, {"name": "Your Lifestyle Preferences", "options": ["I want an active companion for activities", "I prefer a more independent companion"]}, {"name": "Your Experience Level", "options": ["I'm comfortable with training and challenges", "I prefer something naturally well-behaved"]}, {"name": "Your Schedule Flexibility", "options": ["I'm usually home and rarely travel", "I travel sometimes and need flexibility"]}]}"#;

/// Returned by [`RecommendationGenerator::recommend`] on any unsuccessful call.
pub const FALLBACK_RECOMMENDATION: &str = "Based on your choices, I'd recommend considering what feels right for your situation. Trust your instincts!";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::FactorSet;

    #[test]
    fn default_factors_are_well_formed() {
        let set: FactorSet = serde_json::from_str(DEFAULT_FACTORS_JSON).unwrap();
        let names: Vec<_> = set.factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Your Time Availability",
                "Your Living Space",
                "Your Lifestyle Preferences",
                "Your Experience Level",
                "Your Schedule Flexibility",
            ]
        );
        assert!(FactorSet::shape_problems(DEFAULT_FACTORS_JSON).is_empty());
    }
}
