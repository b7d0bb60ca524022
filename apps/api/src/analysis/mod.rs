//! Mood analysis — turns journal text into a mood label, a sentiment score and a
//! supportive tip.
//!
//! `AppState` holds an `Arc<dyn MoodAnalyzer>`. The production backend is
//! `GeminiMoodAnalyzer`; callers always go through `MoodAnalyzer::analyze`,
//! which never fails and degrades to `MoodAnalysis::fallback()`.

pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::analysis::prompts::{build_mood_prompt, mood_response_schema};
use crate::llm_client::LlmClient;
use crate::llm_client::LlmError;

pub const FALLBACK_MOOD: &str = "Neutral";
pub const FALLBACK_SCORE: f64 = 0.5;
pub const FALLBACK_TIP: &str = "I'm listening. Tell me more about your day.";

/// Typed result of a mood analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoodAnalysis {
    pub mood: String,
    pub score: f64,
    pub tip: String,
}

impl MoodAnalysis {
    /// The fixed analysis used whenever the provider cannot produce one.
    pub fn fallback() -> Self {
        Self {
            mood: FALLBACK_MOOD.to_string(),
            score: FALLBACK_SCORE,
            tip: FALLBACK_TIP.to_string(),
        }
    }

    /// Checks what the response schema cannot express.
    pub fn validate(self) -> Result<Self, AnalysisError> {
        if self.mood.trim().is_empty() {
            return Err(AnalysisError::Schema("mood is empty".to_string()));
        }
        if self.tip.trim().is_empty() {
            return Err(AnalysisError::Schema("tip is empty".to_string()));
        }
        if !self.score.is_finite() {
            return Err(AnalysisError::Schema(format!(
                "score is not finite: {}",
                self.score
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Response violates schema: {0}")]
    Schema(String),
}

impl AnalysisError {
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisError::Llm(e) => e.is_transient(),
            AnalysisError::Schema(_) => false,
        }
    }
}

/// The mood analyzer trait. Implement `try_analyze`; callers use `analyze`.
#[async_trait]
pub trait MoodAnalyzer: Send + Sync {
    async fn try_analyze(&self, text: &str) -> Result<MoodAnalysis, AnalysisError>;

    /// Total version of `try_analyze`: logs the failure and returns the fallback.
    async fn analyze(&self, text: &str) -> MoodAnalysis {
        match self.try_analyze(text).await {
            Ok(analysis) => analysis,
            Err(e) if e.is_transient() => {
                warn!("AI Analysis Error (provider unavailable): {e}");
                MoodAnalysis::fallback()
            }
            Err(e) => {
                error!("AI Analysis Error (malformed response): {e}");
                MoodAnalysis::fallback()
            }
        }
    }
}

/// Gemini-backed analyzer with a schema-constrained JSON response.
pub struct GeminiMoodAnalyzer {
    llm: LlmClient,
}

impl GeminiMoodAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MoodAnalyzer for GeminiMoodAnalyzer {
    async fn try_analyze(&self, text: &str) -> Result<MoodAnalysis, AnalysisError> {
        let prompt = build_mood_prompt(text);
        let analysis: MoodAnalysis = self.llm.call_json(&prompt, &mood_response_schema()).await?;
        analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash-lite:generateContent";

    struct Scripted(fn() -> Result<MoodAnalysis, AnalysisError>);

    #[async_trait]
    impl MoodAnalyzer for Scripted {
        async fn try_analyze(&self, _text: &str) -> Result<MoodAnalysis, AnalysisError> {
            (self.0)()
        }
    }

    fn happy() -> MoodAnalysis {
        MoodAnalysis {
            mood: "Happy".to_string(),
            score: 0.9,
            tip: "Keep it up!".to_string(),
        }
    }

    #[test]
    fn test_fallback_values() {
        let fallback = MoodAnalysis::fallback();
        assert_eq!(fallback.mood, "Neutral");
        assert_eq!(fallback.score, 0.5);
        assert_eq!(fallback.tip, "I'm listening. Tell me more about your day.");
    }

    #[test]
    fn test_validate_accepts_well_formed_analysis() {
        assert_eq!(happy().validate().unwrap(), happy());
    }

    #[test]
    fn test_validate_rejects_blank_mood() {
        let analysis = MoodAnalysis {
            mood: "  ".to_string(),
            ..happy()
        };
        assert!(matches!(analysis.validate(), Err(AnalysisError::Schema(_))));
    }

    #[test]
    fn test_validate_rejects_blank_tip() {
        let analysis = MoodAnalysis {
            tip: String::new(),
            ..happy()
        };
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_missing_field_fails_to_deserialize() {
        let result = serde_json::from_str::<MoodAnalysis>(r#"{"mood": "Happy", "tip": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_string_score_fails_to_deserialize() {
        let result = serde_json::from_str::<MoodAnalysis>(
            r#"{"mood": "Happy", "score": "high", "tip": "x"}"#,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_analyze_passes_through_success() {
        let analyzer = Scripted(|| Ok(happy()));
        assert_eq!(analyzer.analyze("Had a great day!").await, happy());
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_transient_error() {
        let analyzer = Scripted(|| {
            Err(AnalysisError::Llm(LlmError::Api {
                status: 429,
                message: "quota exhausted".to_string(),
            }))
        });
        assert_eq!(analyzer.analyze("text").await, MoodAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_schema_error() {
        let analyzer = Scripted(|| Err(AnalysisError::Schema("mood is empty".to_string())));
        assert_eq!(analyzer.analyze("text").await, MoodAnalysis::fallback());
    }

    fn gemini_analyzer(server: &MockServer) -> GeminiMoodAnalyzer {
        let llm = LlmClient::with_base_url("test-key".to_string(), server.uri()).unwrap();
        GeminiMoodAnalyzer::new(llm)
    }

    fn candidate_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.5-flash-lite"
        }))
    }

    #[tokio::test]
    async fn test_gemini_analyzer_decodes_generate_content_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(candidate_reply(
                r#"{"mood":"Happy","score":0.9,"tip":"Keep it up!"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = gemini_analyzer(&server)
            .try_analyze("Had a great day!")
            .await
            .unwrap();
        assert_eq!(analysis, happy());

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Had a great day!"));
    }

    #[tokio::test]
    async fn test_gemini_rate_limit_is_transient_and_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted (e.g. check quota).",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })))
            .mount(&server)
            .await;

        let analyzer = gemini_analyzer(&server);
        let err = analyzer.try_analyze("text").await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err,
            AnalysisError::Llm(LlmError::Api { status: 429, .. })
        ));
        assert_eq!(analyzer.analyze("text").await, MoodAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_gemini_reply_missing_score_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(candidate_reply(r#"{"mood":"Happy","tip":"Keep it up!"}"#))
            .mount(&server)
            .await;

        let analyzer = gemini_analyzer(&server);
        let err = analyzer.try_analyze("text").await.unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(analyzer.analyze("text").await, MoodAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_gemini_analyzer_falls_back_when_provider_unreachable() {
        // Port 9 (discard) on localhost refuses connections.
        let llm = LlmClient::with_base_url("test-key".to_string(), "http://127.0.0.1:9".to_string())
            .unwrap();
        let analyzer = GeminiMoodAnalyzer::new(llm);

        assert!(analyzer.try_analyze("text").await.is_err());
        assert_eq!(analyzer.analyze("text").await, MoodAnalysis::fallback());
    }
}
