//! Analysis gateway: one model call, a forgiving response parser, and the
//! offline fallback as the universal safety net.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::analysis::{self, AnalysisResult};
use crate::llm::GenerativeModel;
use crate::prompt::build_analysis_prompt;

static RE_JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Result of the model path before the fallback is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(AnalysisResult),
    Failure(String),
}

impl Outcome {
    /// Collapse into a result, substituting the fallback for `text` on failure.
    pub fn or_fallback(self, text: &str) -> AnalysisResult {
        match self {
            Outcome::Success(result) => result,
            Outcome::Failure(reason) => {
                warn!("Model analysis failed, using fallback: {}", reason);
                analysis::fallback(text)
            }
        }
    }
}

/// Strip markdown fences, keep the span from the first `{` to the last `}`,
/// and parse it as a shape-valid [`AnalysisResult`].
pub fn parse_model_response(response: &str) -> Outcome {
    let cleaned = response.trim().replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let candidate = RE_JSON_OBJECT
        .find(cleaned)
        .map(|m| m.as_str())
        .unwrap_or(cleaned);

    let result: AnalysisResult = match serde_json::from_str(candidate) {
        Ok(result) => result,
        Err(e) => {
            return Outcome::Failure(format!(
                "Invalid analysis JSON ({}): {}",
                e,
                candidate.chars().take(200).collect::<String>()
            ))
        }
    };

    match result.validate() {
        Ok(()) => Outcome::Success(result),
        Err(e) => Outcome::Failure(format!("Analysis JSON has the wrong shape: {}", e)),
    }
}

/// Entry point for content analysis. Always returns a well-formed result.
#[derive(Clone)]
pub struct Gateway {
    model: Option<Arc<dyn GenerativeModel>>,
    timeout: Duration,
}

impl Gateway {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Gateway with no model; every call returns the fallback.
    #[cfg(test)]
    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(60))
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        match &self.model {
            None => {
                info!("No model configured, using fallback analysis");
                analysis::fallback(text)
            }
            Some(model) => self.run_model(model.as_ref(), text).await.or_fallback(text),
        }
    }

    /// Exactly one attempt, bounded by the configured timeout.
    async fn run_model(&self, model: &dyn GenerativeModel, text: &str) -> Outcome {
        let prompt = build_analysis_prompt(text);
        info!(
            "Requesting analysis from {} ({} chars of content)",
            model.name(),
            text.chars().count()
        );

        let response = match tokio::time::timeout(self.timeout, model.generate(&prompt)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Outcome::Failure(format!("{} call failed: {:#}", model.name(), e)),
            Err(_) => {
                return Outcome::Failure(format!(
                    "{} call timed out after {:?}",
                    model.name(),
                    self.timeout
                ))
            }
        };

        debug!("Raw model response: {}", response);
        parse_model_response(&response)
    }
}
