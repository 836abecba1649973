use serde::{Deserialize, Serialize};

// --- Domain types ---

/// Output language for everything the model writes. The celebrity pool is
/// the same for both: the instruction always asks for Chinese celebrities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }
}

/// A successful analysis always carries exactly this many matches.
pub const MATCH_COUNT: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityMatch {
    pub name: String,
    pub image_url: String,
    pub similarity: f64,
    pub reason: String,
    /// The facial feature this match is compared on, e.g. "Eye Shape".
    pub angle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacialAnalysis {
    pub fortune: String,
    pub health: String,
    pub makeup: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub celebrity_matches: Vec<CelebrityMatch>,
    pub facial_analysis: FacialAnalysis,
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

// Variant order matters for untagged decoding: a text part must be tried
// before inline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_parse_case_insensitively() {
        assert_eq!(Language::from_tag("en"), Some(Language::En));
        assert_eq!(Language::from_tag("ZH"), Some(Language::Zh));
        assert_eq!(Language::from_tag(" En "), Some(Language::En));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::from_tag(""), None);
    }

    #[test]
    fn result_uses_camel_case_on_the_wire() {
        let result = AnalysisResult {
            celebrity_matches: vec![CelebrityMatch {
                name: "Tony Leung".to_string(),
                image_url: "https://example.com/tony.jpg".to_string(),
                similarity: 87.0,
                reason: "Similar deep-set eyes.".to_string(),
                angle: "Eye Shape".to_string(),
            }],
            facial_analysis: FacialAnalysis {
                fortune: "f".to_string(),
                health: "h".to_string(),
                makeup: "m".to_string(),
            },
        };

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("celebrityMatches").is_some());
        assert!(value.get("facialAnalysis").is_some());
        assert!(value["celebrityMatches"][0].get("imageUrl").is_some());
    }

    #[test]
    fn response_part_decodes_text_variant() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{}"}]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let content = response.candidates[0].content.as_ref().unwrap();
        assert!(matches!(content.parts[0], Part::Text { .. }));
    }
}
