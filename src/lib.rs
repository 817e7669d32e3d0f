//! decision-helper: turns a free-text decision question into five factors with two
//! options each, then into a short recommendation, using a remote chat-completion model.

pub mod clients;
pub mod config;
pub mod decision;
pub mod error;
pub mod http;
pub mod prompts;
pub mod schemas;

pub use config::Config;
pub use decision::{
    DEFAULT_FACTORS_JSON, FALLBACK_RECOMMENDATION, FactorExtractor, RecommendationGenerator,
};
pub use error::{DecisionError, RemoteCallError};
