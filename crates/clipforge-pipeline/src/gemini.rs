//! Gemini content-analysis and hook-generation client.
//!
//! Two collaborator calls back the pipeline: scene analysis (transcript
//! synthesis, segmentation hints and virality scoring) and per-clip hook
//! generation. Both go through the `generateContent` REST endpoint with
//! a JSON response mime type; authentication failures are classified by
//! message so the boundary can prompt for a new key.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use clipforge_models::{Language, Scene};

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const ANALYSIS_MODEL: &str = "gemini-2.5-pro";
const HOOK_MODEL: &str = "gemini-2.5-flash";

/// Gemini API client.
pub struct AnalysisClient {
    api_key: String,
    base_url: String,
    client: Client,
}

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

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Scene analysis payload.
#[derive(Debug, Deserialize)]
struct ScenesResponse {
    scenes: Vec<Scene>,
}

impl AnalysisClient {
    /// Create a client with the key from `GEMINI_API_KEY`.
    pub fn new() -> PipelineResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| PipelineError::CredentialInvalid("GEMINI_API_KEY not set".to_string()))?;
        Ok(Self::with_base_url(api_key, DEFAULT_BASE_URL))
    }

    /// Create a client against a specific endpoint (tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Analyze video content and return scored scenes with transcripts.
    pub async fn analyze_video_content(
        &self,
        topic: &str,
        duration: f64,
        source_language: Language,
        target_language: Language,
        clip_length_range: (f64, f64),
    ) -> PipelineResult<Vec<Scene>> {
        info!(topic, duration, "requesting scene analysis");
        let prompt = build_analysis_prompt(
            topic,
            duration,
            source_language,
            target_language,
            clip_length_range,
        );

        let text = self.call_api(ANALYSIS_MODEL, &prompt).await?;
        let parsed: ScenesResponse = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| PipelineError::ai_failed(format!("Failed to parse scenes JSON: {e}")))?;

        if parsed.scenes.is_empty() {
            warn!("analysis returned zero scenes");
        }
        Ok(parsed.scenes)
    }

    /// Generate a short hook for a clip from a content excerpt.
    ///
    /// The returned string is trimmed and stripped of quote characters.
    pub async fn generate_hook(
        &self,
        excerpt: &str,
        target_language: Language,
    ) -> PipelineResult<String> {
        let prompt = format!(
            r#"Generate a short, viral-style hook (under 15 words) in {} for a video clip with the following summary.
Make it intriguing and attention-grabbing. Do not include quotes.
Summary: "{}""#,
            target_language.as_str(),
            excerpt
        );

        let text = self.call_api(HOOK_MODEL, &prompt).await?;
        Ok(text.trim().replace('"', ""))
    }

    async fn call_api(&self, model: &str, prompt: &str) -> PipelineResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

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

        debug!(model, "calling Gemini API");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("Gemini API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::from_ai_message(format!(
                "Gemini API returned {status}: {error_text}"
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("Failed to parse Gemini response: {e}")))?;

        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| PipelineError::ai_failed("No content in Gemini response"))
    }
}

fn build_analysis_prompt(
    topic: &str,
    duration: f64,
    source_language: Language,
    target_language: Language,
    (min, max): (f64, f64),
) -> String {
    let translation_note = if source_language != target_language {
        format!(
            " This involves translating from {}.",
            source_language.as_str()
        )
    } else {
        String::new()
    };

    format!(
        r#"You are an expert AI video editor. Your task is to analyze a video's content and identify the most viral-worthy short clips.

The video is about "{topic}", is {duration:.0} seconds long and is in {source_lang}.

Your process is:
1. Analyze the narrative and create a plausible, detailed transcript in {target_lang}.{translation_note}
2. For each transcript line, provide precise word-by-word timestamps. Each word needs its own "start" and "end" time.
3. For each transcript line, suggest a single relevant "emoji".
4. Segment the video into distinct scenes by topic. Each scene MUST have a duration between {min:.0} and {max:.0} seconds.
5. Assign each scene a "viralityScore" (1-10) with "reasoning".
6. Write a short "summary" for each scene.

Return ONLY a single JSON object with a "scenes" key. Each scene must contain: "topic", "summary", "viralityScore", "reasoning", "startTime", "endTime", and a "transcript" array. Each transcript entry must contain: "start", "end", "text", an optional "emoji", and a "words" array of objects with "start", "end", "text".

Ensure all timestamps are accurate relative to the video's {duration:.0}s duration. Generate at least 5-8 distinct scenes."#,
        topic = topic,
        duration = duration,
        source_lang = source_language.as_str(),
        target_lang = target_language.as_str(),
        min = min,
        max = max,
    )
}

/// Strip markdown code fences the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
