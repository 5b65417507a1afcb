pub mod ai;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod group;
pub mod state;

// Re-export main types for convenience
pub use ai::{GeminiClient, GenerationRequest, GenerationResult, PromptStyle};
pub use assistant::{Assistant, AssistantState, Ticket};
pub use auth::{AuthClient, AuthError, Session};
pub use config::Config;
pub use error::{AssistError, ShapeError, TransportError, FALLBACK_MESSAGE};
pub use group::{Answer, Channel, Event, Group, GroupDraft, Question, Resource, ResourceDraft, Thread};
pub use state::{ChatLog, ChatMessage, Sender};
