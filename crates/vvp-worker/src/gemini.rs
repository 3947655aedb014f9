//! Gemini client for qualitative video grading.
//!
//! Sends the transcript, top comments and statistics to `generateContent`
//! with a JSON response MIME type and parses the four KPI grades, semantic
//! hotspots and golden clip suggestion. Configured models are tried in
//! order until one answers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vvp_models::QualitativeAnalysis;

use crate::error::{WorkerError, WorkerResult};
use crate::sources::{QualitativeAnalyzer, QualitativeInput};

/// Comments included in the prompt.
const PROMPT_COMMENT_LIMIT: usize = 50;

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    models: Vec<String>,
    transcript_char_limit: usize,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        models: Vec<String>,
        transcript_char_limit: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            models,
            transcript_char_limit,
        }
    }

    /// Grade a video, falling back through the configured models.
    pub async fn analyze_video(
        &self,
        input: &QualitativeInput,
        api_key: &str,
    ) -> WorkerResult<QualitativeAnalysis> {
        let prompt = self.build_prompt(input);

        let mut last_error = None;
        for model in &self.models {
            info!(video_id = %input.video_id, "Attempting Gemini API with model: {}", model);
            match self.call_gemini_api(model, api_key, &prompt).await {
                Ok(mut analysis) => {
                    analysis.model = Some(model.clone());
                    info!("Got qualitative analysis from {}", model);
                    return Ok(analysis);
                }
                Err(e) => {
                    warn!("Failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| WorkerError::ai_failed("No Gemini models configured")))
    }

    /// Build prompt for Gemini.
    fn build_prompt(&self, input: &QualitativeInput) -> String {
        let transcript = if input.transcript.trim().is_empty() {
            "(no transcript available; rely on comments and metadata)".to_string()
        } else {
            input.transcript.chars().take(self.transcript_char_limit).collect()
        };

        let comments = input
            .comments
            .iter()
            .take(PROMPT_COMMENT_LIMIT)
            .map(|c| format!("- ({} likes) {}", c.like_count, c.text.replace('\n', " ")))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a professional YouTube video analyst.
Evaluate the video below from its transcript, viewer comments and engagement data.

# Video
Title: {title}
Duration: {duration} seconds
Views: {views}, Likes: {likes}, Comments: {comment_count}
Description: {description}

# Transcript
{transcript}

# Top viewer comments
{comments}

Return ONLY a single JSON object with this schema. Every score is on a 0-10 scale.
{{
  "narrative_structure": {{"score": <number>, "reason": "story arc: intro, development, climax, conclusion"}},
  "hook_effectiveness": {{"score": <number>, "reason": "how well the opening retains viewers"}},
  "emotional_engagement": {{"score": <number>, "reason": "emotional resonance in the comments"}},
  "technical_quality": {{"score": <number>, "reason": "audio, pacing and editing quality"}},
  "dominant_emotion": "most common emotion among viewers",
  "semantic_hotspots": [{{"time": "MM:SS", "reason": "what viewers valued at this moment"}}],
  "golden_clip_suggestion": {{"time_range": "MM:SS-MM:SS", "reason": "why this moment would make the best clip"}},
  "summary": "two or three sentence overall assessment"
}}
"#,
            title = input.title,
            duration = input.duration_secs,
            views = input.view_count,
            likes = input.like_count,
            comment_count = input.comment_count,
            description = input.description.chars().take(1000).collect::<String>(),
            transcript = transcript,
            comments = if comments.is_empty() { "(none)".to_string() } else { comments },
        )
    }

    /// Call Gemini API.
    async fn call_gemini_api(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> WorkerResult<QualitativeAnalysis> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkerError::ai_failed(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WorkerError::ai_failed(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            WorkerError::ai_failed(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| WorkerError::ai_failed("No content in Gemini response"))?;

        parse_analysis_json(text)
    }
}

/// Parse the model's JSON, tolerating a surrounding markdown code fence.
pub fn parse_analysis_json(text: &str) -> WorkerResult<QualitativeAnalysis> {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);

    serde_json::from_str(text.trim())
        .map_err(|e| WorkerError::ai_failed(format!("Failed to parse analysis JSON: {}", e)))
}

#[async_trait]
impl QualitativeAnalyzer for GeminiClient {
    async fn analyze(
        &self,
        input: &QualitativeInput,
        api_key: &str,
    ) -> WorkerResult<QualitativeAnalysis> {
        self.analyze_video(input, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vvp_models::Comment;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANALYSIS: &str = r#"{
        "narrative_structure": {"score": 8, "reason": "clear arc"},
        "hook_effectiveness": {"score": 7.5, "reason": "strong open"},
        "emotional_engagement": {"score": 9, "reason": "moving"},
        "technical_quality": {"score": 6, "reason": "ok audio"},
        "dominant_emotion": "感動",
        "semantic_hotspots": [{"time": "01:30", "reason": "climax"}],
        "golden_clip_suggestion": {"time_range": "01:20-01:50", "reason": "peak"},
        "summary": "Great video"
    }"#;

    fn gemini_body(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    fn input() -> QualitativeInput {
        QualitativeInput {
            video_id: "dQw4w9WgXcQ".into(),
            title: "Test".into(),
            transcript: "[00:00:01] hello".into(),
            comments: vec![Comment::new("a", "1:30 最高", 3)],
            ..Default::default()
        }
    }

    fn client(uri: String, models: &[&str]) -> GeminiClient {
        GeminiClient::new(uri, models.iter().map(|m| m.to_string()).collect(), 100)
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", ANALYSIS);
        let analysis = parse_analysis_json(&fenced).unwrap();
        assert_eq!(analysis.hook_effectiveness.unwrap().score, Some(7.5));
        assert_eq!(analysis.semantic_hotspots[0].time, "01:30");

        assert!(matches!(
            parse_analysis_json("not json"),
            Err(WorkerError::AiFailed(_))
        ));
    }

    #[test]
    fn test_prompt_truncates_transcript() {
        let mut input = input();
        input.transcript = "x".repeat(500);
        let prompt = client("http://unused".into(), &["m"]).build_prompt(&input);
        assert!(prompt.contains(&"x".repeat(100)));
        assert!(!prompt.contains(&"x".repeat(101)));
        assert!(prompt.contains("- (3 likes) 1:30 最高"));
    }

    #[tokio::test]
    async fn test_analyze_video() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .and(query_param("key", "g-key"))
            .and(body_string_contains("responseMimeType"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(ANALYSIS)))
            .mount(&server)
            .await;

        let analysis = client(server.uri(), &["gemini-a"])
            .analyze_video(&input(), "g-key")
            .await
            .unwrap();

        assert_eq!(analysis.model.as_deref(), Some("gemini-a"));
        assert_eq!(analysis.narrative_structure.unwrap().score, Some(8.0));
        assert_eq!(analysis.dominant_emotion.as_deref(), Some("感動"));
    }

    #[tokio::test]
    async fn test_model_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-a:generateContent"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-b:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(ANALYSIS)))
            .mount(&server)
            .await;

        let analysis = client(server.uri(), &["gemini-a", "gemini-b"])
            .analyze_video(&input(), "g-key")
            .await
            .unwrap();
        assert_eq!(analysis.model.as_deref(), Some("gemini-b"));
    }

    #[tokio::test]
    async fn test_all_models_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = client(server.uri(), &["gemini-a", "gemini-b"])
            .analyze_video(&input(), "bad")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_no_models_configured() {
        let err = client("http://unused".into(), &[])
            .analyze_video(&input(), "key")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::AiFailed(_)));
    }
}
