//! Engagement analysis result types and the offline fallback.
//!
//! Both the model path and the fallback produce the same fixed-shape
//! [`AnalysisResult`]; [`AnalysisResult::validate`] enforces the per-field counts.

use serde::{Deserialize, Serialize};

pub const STRENGTH_COUNT: usize = 3;
pub const IMPROVEMENT_COUNT: usize = 3;
pub const HASHTAG_COUNT: usize = 5;
pub const PLATFORM_COUNT: usize = 2;
pub const MAX_SCORE: u8 = 100;

/// Structured engagement analysis of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0-100
    pub overall_score: u8,
    pub sentiment: String,
    pub content_type: String,
    pub word_count: usize,
    pub readability: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<Improvement>,
    pub suggested_hashtags: Vec<String>,
    pub best_platforms: Vec<String>,
    pub optimal_post_time: String,
    pub rewritten_hook: String,
    pub cta_suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub priority: Priority,
    pub suggestion: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

/// Why a result does not have the contracted shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("overall_score {0} is above 100")]
    ScoreOutOfRange(u8),

    #[error("{field} has {actual} entries, expected {expected}")]
    WrongCount {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("improvements must cover High, Medium and Low once each")]
    PriorityMix,
}

impl AnalysisResult {
    /// Check score range and the exact cardinality of every list field.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.overall_score > MAX_SCORE {
            return Err(ShapeError::ScoreOutOfRange(self.overall_score));
        }

        check_count("strengths", self.strengths.len(), STRENGTH_COUNT)?;
        check_count("improvements", self.improvements.len(), IMPROVEMENT_COUNT)?;
        check_count(
            "suggested_hashtags",
            self.suggested_hashtags.len(),
            HASHTAG_COUNT,
        )?;
        check_count("best_platforms", self.best_platforms.len(), PLATFORM_COUNT)?;

        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            if !self.improvements.iter().any(|i| i.priority == priority) {
                return Err(ShapeError::PriorityMix);
            }
        }

        Ok(())
    }
}

fn check_count(field: &'static str, actual: usize, expected: usize) -> Result<(), ShapeError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ShapeError::WrongCount {
            field,
            expected,
            actual,
        })
    }
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Deterministic stand-in for a model analysis. Only `word_count` depends on
/// the input.
pub fn fallback(text: &str) -> AnalysisResult {
    AnalysisResult {
        overall_score: 74,
        sentiment: "Neutral".to_string(),
        content_type: "Educational".to_string(),
        word_count: word_count(text),
        readability: "Moderate".to_string(),
        strengths: vec![
            "Clear topic focus".to_string(),
            "Understandable structure".to_string(),
            "Good base message for improvement".to_string(),
        ],
        improvements: vec![
            Improvement {
                priority: Priority::High,
                suggestion: "Add a stronger opening hook in the first line".to_string(),
                reason: "A stronger hook improves scroll-stop rate and initial engagement"
                    .to_string(),
            },
            Improvement {
                priority: Priority::Medium,
                suggestion: "Include 3-5 niche-relevant hashtags".to_string(),
                reason: "Hashtags improve discoverability on most platforms".to_string(),
            },
            Improvement {
                priority: Priority::Low,
                suggestion: "Add a question-based CTA".to_string(),
                reason: "Questions encourage comments and interaction".to_string(),
            },
        ],
        suggested_hashtags: vec![
            "#ContentStrategy".to_string(),
            "#SocialMedia".to_string(),
            "#CreatorTips".to_string(),
            "#Growth".to_string(),
            "#Marketing".to_string(),
        ],
        best_platforms: vec!["LinkedIn".to_string(), "Instagram".to_string()],
        optimal_post_time: "Tue-Thu, 9-11 AM".to_string(),
        rewritten_hook:
            "Want more engagement on your posts? Start with this one simple change.".to_string(),
        cta_suggestion: "What would you improve in this post? Share your take below.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let result = fallback("some words here");
        assert_eq!(result.strengths.len(), 3);
        assert_eq!(result.improvements.len(), 3);
        assert_eq!(result.suggested_hashtags.len(), 5);
        assert_eq!(result.best_platforms.len(), 2);
        let priorities: Vec<Priority> = result.improvements.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_fallback_word_count() {
        assert_eq!(fallback("").word_count, 0);
        assert_eq!(fallback("one").word_count, 1);
        assert_eq!(fallback("  one\ttwo\nthree   four ").word_count, 4);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback("alpha beta");
        let b = fallback("gamma delta");
        assert_eq!(a, b);
        assert_ne!(a, fallback("one two three"));
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(fallback("hi")).unwrap();
        for key in [
            "overall_score",
            "sentiment",
            "content_type",
            "word_count",
            "readability",
            "strengths",
            "improvements",
            "suggested_hashtags",
            "best_platforms",
            "optimal_post_time",
            "rewritten_hook",
            "cta_suggestion",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["improvements"][0]["priority"], "High");
    }

    #[test]
    fn test_validate_rejects_wrong_counts() {
        let mut result = fallback("x");
        result.suggested_hashtags.pop();
        assert_eq!(
            result.validate(),
            Err(ShapeError::WrongCount {
                field: "suggested_hashtags",
                expected: 5,
                actual: 4
            })
        );

        let mut result = fallback("x");
        result.overall_score = 101;
        assert_eq!(result.validate(), Err(ShapeError::ScoreOutOfRange(101)));

        let mut result = fallback("x");
        result.improvements[2].priority = Priority::High;
        assert_eq!(result.validate(), Err(ShapeError::PriorityMix));
    }
}
