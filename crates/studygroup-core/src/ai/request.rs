//! Request builder and the provider's JSON envelope.

use serde::Serialize;

use super::prompt::PromptStyle;
use crate::error::AssistError;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// One submission's worth of request body. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerationRequest {
    /// Build a request for `question`. Rejects input that is empty once
    /// trimmed; otherwise the text is used as given.
    pub fn build(style: PromptStyle, question: &str) -> Result<Self, AssistError> {
        if question.trim().is_empty() {
            return Err(AssistError::InputRejected);
        }

        Ok(Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: style.render(question),
                }],
            }],
            generation_config: GenerationConfig::default(),
        })
    }

    /// The text of the single user message.
    pub fn prompt(&self) -> &str {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }

    pub fn generation_config(&self) -> GenerationConfig {
        self.generation_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_rejects_blank_input() {
        for input in ["", "   ", "\n\t "] {
            let result = GenerationRequest::build(PromptStyle::General, input);
            assert!(matches!(result, Err(AssistError::InputRejected)));
        }
    }

    #[test]
    fn test_envelope_shape() {
        let request = GenerationRequest::build(PromptStyle::General, "What is 2+2?").unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "What is 2+2?" }] }],
                "generationConfig": { "temperature": 0.7, "maxOutputTokens": 500 }
            })
        );
    }

    #[test]
    fn test_tutor_request_carries_preamble() {
        let request = GenerationRequest::build(PromptStyle::Tutor, "Derivative of x^2?").unwrap();
        assert!(request.prompt().starts_with("As a helpful academic tutor"));
        assert!(request.prompt().ends_with("Derivative of x^2?"));
    }

    #[test]
    fn test_fixed_generation_parameters() {
        let request = GenerationRequest::build(PromptStyle::Tutor, "anything").unwrap();
        let config = request.generation_config();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_output_tokens, 500);
    }
}
