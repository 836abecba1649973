use base64::{engine::general_purpose, Engine as _};
use serde_json::json;

use crate::models::{Content, GeminiRequest, GenerationConfig, InlineData, Language, Part};

const LANGUAGE_INSTRUCTION_EN: &str = "Please provide all textual responses in English, \
     including reasons, angles, fortune, health, and makeup suggestions.";
const LANGUAGE_INSTRUCTION_ZH: &str =
    "请用中文回答所有文本内容，包括理由、角度、面相、健康和化妆建议。";

// Both locales draw from the same celebrity pool; only the wording changes.
const CELEBRITY_INSTRUCTION_EN: &str =
    "Find exactly 6 Chinese celebrities (from mainland China, Hong Kong, or Taiwan) they resemble.";
const CELEBRITY_INSTRUCTION_ZH: &str =
    "找到6位与其相貌相似的中国名人（包括中国大陆、香港或台湾）。";

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::En => LANGUAGE_INSTRUCTION_EN,
        Language::Zh => LANGUAGE_INSTRUCTION_ZH,
    }
}

fn celebrity_instruction(language: Language) -> &'static str {
    match language {
        Language::En => CELEBRITY_INSTRUCTION_EN,
        Language::Zh => CELEBRITY_INSTRUCTION_ZH,
    }
}

pub fn build_instruction(language: Language) -> String {
    format!(
        "Analyze the person in this photo. {}\n\
         1. Identify their key facial features.\n\
         2. {} Each match must focus on a different, distinct facial feature or aesthetic \
         angle (e.g., \"Eye Shape\", \"Smile\", \"Jawline\"). Do not use the same angle twice.\n\
         3. For each celebrity match, provide their full name, a publicly accessible image URL \
         of the celebrity's face, a similarity score from 0 to 100, a brief one-sentence reason \
         for the resemblance, and the name of the angle itself.\n\
         4. Additionally, perform a 'San Ting Wu Yan' (Three Courts and Five Eyes) facial \
         proportion analysis. Based on this analysis, provide a short, insightful, and positive \
         paragraph for each of the following: a 'Fortune' reading (面相运势), a 'Health' insight \
         (健康), and a 'Makeup Suggestion' (化妆建议) to enhance their features.\n\
         5. Return the result as a single valid JSON object that conforms to the provided \
         schema, containing both the celebrity matches and the facial analysis.",
        language_instruction(language),
        celebrity_instruction(language),
    )
}

/// Declared response schema the model must conform to: six match objects
/// plus the three-part facial analysis, all fields required.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "celebrityMatches": {
                "type": "ARRAY",
                "description": "An array of 6 celebrity matches.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Full name of the celebrity." },
                        "imageUrl": { "type": "STRING", "description": "A publicly accessible URL for an image of the celebrity's face." },
                        "similarity": { "type": "NUMBER", "description": "Similarity score from 0 to 100." },
                        "reason": { "type": "STRING", "description": "Brief reason for the resemblance." },
                        "angle": { "type": "STRING", "description": "The feature or perspective being compared." }
                    },
                    "required": ["name", "imageUrl", "similarity", "reason", "angle"]
                }
            },
            "facialAnalysis": {
                "type": "OBJECT",
                "description": "Analysis based on San Ting Wu Yan.",
                "properties": {
                    "fortune": { "type": "STRING", "description": "Fortune reading based on facial features." },
                    "health": { "type": "STRING", "description": "Health insights based on facial features." },
                    "makeup": { "type": "STRING", "description": "Makeup suggestions to enhance features." }
                },
                "required": ["fortune", "health", "makeup"]
            }
        },
        "required": ["celebrityMatches", "facialAnalysis"]
    })
}

/// Pure transformation of (image bytes, mime type, language) into the
/// request payload. The image part goes first, then the instruction.
pub fn build_request(image_bytes: &[u8], mime_type: &str, language: Language) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: None,
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: general_purpose::STANDARD.encode(image_bytes),
                    },
                },
                Part::Text {
                    text: build_instruction(language),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}
