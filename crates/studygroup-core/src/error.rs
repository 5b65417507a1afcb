//! Error types for the AI-assistance flow.
//!
//! Every failure keeps its cause for logging, but the user only ever sees
//! [`FALLBACK_MESSAGE`] (see [`AssistError::user_message`]).

use reqwest::StatusCode;
use thiserror::Error;

/// The single message shown for any failed generation.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I encountered an error while processing your question. Please try again.";

#[derive(Debug, Error)]
pub enum AssistError {
    /// Empty or whitespace-only question. Never reaches the transport.
    #[error("question is empty")]
    InputRejected,
    /// A request is already in flight for this assistant.
    #[error("a question is already being answered")]
    Busy,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("generation request failed with status {0}")]
    Status(StatusCode),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("malformed response body: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

/// The response decoded but the answer text was not where it should be.
#[derive(Debug, Error)]
#[error("unexpected response shape: missing {missing}")]
pub struct ShapeError {
    pub missing: &'static str,
}

impl AssistError {
    /// Presentation mapping. All transport and shape failures collapse to one
    /// string; local rejections are never displayed as an answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistError::InputRejected => "Please type a question first.",
            AssistError::Busy => "Still working on your last question...",
            AssistError::Transport(_) | AssistError::Shape(_) => FALLBACK_MESSAGE,
        }
    }
}
