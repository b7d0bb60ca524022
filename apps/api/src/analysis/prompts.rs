// Mood analysis LLM prompt template and response schema.

use serde_json::{json, Value};

pub const MOOD_ANALYSIS_PROMPT: &str =
    "Analyze this journal entry for mood and provide a short supportive tip: {text}";

pub fn build_mood_prompt(text: &str) -> String {
    MOOD_ANALYSIS_PROMPT.replace("{text}", text)
}

/// Gemini response schema: an object with required `mood`, `score` and `tip`.
pub fn mood_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mood": {"type": "STRING"},
            "score": {"type": "NUMBER"},
            "tip": {"type": "STRING"}
        },
        "required": ["mood", "score", "tip"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let prompt = build_mood_prompt("Had a great day! {braces} stay");
        assert_eq!(
            prompt,
            "Analyze this journal entry for mood and provide a short supportive tip: \
             Had a great day! {braces} stay"
        );
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = mood_response_schema();
        assert_eq!(schema["required"], json!(["mood", "score", "tip"]));
        assert_eq!(schema["properties"]["score"]["type"], "NUMBER");
    }
}
