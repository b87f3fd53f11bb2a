//! Prompt sent to the generative model.

/// JSON shape the model must answer with. Field names and list lengths are
/// part of the contract checked by [`crate::analysis::AnalysisResult::validate`].
pub const RESPONSE_SCHEMA: &str = r#"{
  "overall_score": int (0-100),
  "sentiment": string,
  "content_type": string,
  "word_count": int,
  "readability": string,
  "strengths": [string, string, string],
  "improvements": [
    {"priority":"High","suggestion":"...","reason":"..."},
    {"priority":"Medium","suggestion":"...","reason":"..."},
    {"priority":"Low","suggestion":"...","reason":"..."}
  ],
  "suggested_hashtags": [string, string, string, string, string],
  "best_platforms": [string, string],
  "optimal_post_time": string,
  "rewritten_hook": string,
  "cta_suggestion": string
}"#;

pub fn build_analysis_prompt(text: &str) -> String {
    format!(
        "You are a professional social media growth strategist.\n\n\
         Analyze the following content and return STRICTLY valid JSON.\n\
         Do not include markdown or explanations.\n\n\
         Content:\n{text}\n\n\
         Return JSON in exactly this format:\n{RESPONSE_SCHEMA}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_content_and_schema() {
        let prompt = build_analysis_prompt("Launching our new app today");
        assert!(prompt.contains("Content:\nLaunching our new app today\n"));
        assert!(prompt.contains(RESPONSE_SCHEMA));
        assert!(
            prompt.contains("\"suggested_hashtags\": [string, string, string, string, string]")
        );
    }
}
