//! Response interpreter.

use serde_json::Value;

use crate::error::{AssistError, ShapeError};

/// Pull `candidates[0].content.parts[0].text` out of a decoded body.
pub fn extract_text(body: &Value) -> Result<String, ShapeError> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or(ShapeError { missing: "candidates[0]" })?;
    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .ok_or(ShapeError { missing: "content.parts" })?;
    parts
        .get(0)
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ShapeError { missing: "parts[0].text" })
}

/// What the user gets to see for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Answer(String),
    /// The request failed; holds the message to show instead.
    Failed(&'static str),
}

impl GenerationResult {
    /// Collapse an outcome for display. Failures are logged here and
    /// nowhere else.
    pub fn from_outcome(outcome: Result<String, AssistError>) -> Self {
        match outcome {
            Ok(text) => GenerationResult::Answer(text),
            Err(err) => {
                tracing::warn!(error = %err, "AI assistance failed");
                GenerationResult::Failed(err.user_message())
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            GenerationResult::Answer(text) => text,
            GenerationResult::Failed(message) => message,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationResult::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, FALLBACK_MESSAGE};
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_extract_first_candidate() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "4" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "five" }] } }
            ]
        });
        assert_eq!(extract_text(&body).unwrap(), "4");
    }

    #[test]
    fn test_missing_links_are_shape_errors() {
        let cases = [
            (json!({}), "candidates[0]"),
            (json!({ "candidates": [] }), "candidates[0]"),
            (json!({ "candidates": [{ "finishReason": "SAFETY" }] }), "content.parts"),
            (json!({ "candidates": [{ "content": { "parts": [] } }] }), "parts[0].text"),
            (json!({ "candidates": [{ "content": { "parts": [{ "text": 4 }] } }] }), "parts[0].text"),
        ];

        for (body, missing) in cases {
            let err = extract_text(&body).unwrap_err();
            assert_eq!(err.missing, missing, "body: {body}");
        }
    }

    #[test]
    fn test_failures_collapse_to_fallback_text() {
        let result = GenerationResult::from_outcome(Err(
            TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR).into(),
        ));
        assert!(result.is_fallback());
        assert_eq!(result.text(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_answer_text_is_exact() {
        let result = GenerationResult::from_outcome(Ok("  spaced\nanswer ".to_string()));
        assert_eq!(result.text(), "  spaced\nanswer ");
    }
}
