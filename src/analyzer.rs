use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AnalysisResult, GeminiResponse, Language, Part, MATCH_COUNT};
use crate::prompt;

/// Adapter for the Gemini `generateContent` call. Built once at startup
/// with its credential and shared by handle; issues exactly one outbound
/// request per `analyze` invocation, with no retries and no caching.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.clone(),
            model: config.gemini_model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    /// Callers receive either a fully-shaped result or a typed failure,
    /// never a partially parsed object.
    pub async fn analyze(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
        language: Language,
    ) -> Result<AnalysisResult, AnalysisError> {
        if image_bytes.is_empty() {
            return Err(AnalysisError::MissingInput);
        }

        let request = prompt::build_request(image_bytes, mime_type, language);

        info!(
            "Sending photo to Gemini: {} bytes, type {}",
            image_bytes.len(),
            mime_type
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AnalysisError::Transport(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let envelope: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::Transport(format!("undecodable response envelope: {}", e))
        })?;

        let text = extract_text(&envelope).ok_or_else(|| {
            AnalysisError::Transport("response carried no text candidate".to_string())
        })?;

        parse_analysis(&text)
    }
}

fn extract_text(response: &GeminiResponse) -> Option<String> {
    let mut out = String::new();
    for candidate in &response.candidates {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Part::Text { text } = part {
                    out.push_str(text);
                }
            }
        }
    }
    if out.trim().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Validates the model's JSON text. All-or-nothing: the reply must parse,
/// carry both top-level fields, and hold exactly six matches.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let matches = value
        .get("celebrityMatches")
        .and_then(|v| v.as_array())
        .ok_or_else(|| AnalysisError::UnexpectedFormat("missing celebrityMatches".to_string()))?;

    if matches.len() != MATCH_COUNT {
        return Err(AnalysisError::UnexpectedFormat(format!(
            "expected {} celebrity matches, got {}",
            MATCH_COUNT,
            matches.len()
        )));
    }

    if value.get("facialAnalysis").is_none() {
        return Err(AnalysisError::UnexpectedFormat(
            "missing facialAnalysis".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AnalysisError::UnexpectedFormat(e.to_string()))
}
