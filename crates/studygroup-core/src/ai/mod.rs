pub mod gemini;
pub mod prompt;
pub mod request;
pub mod response;

pub use gemini::GeminiClient;
pub use prompt::PromptStyle;
pub use request::GenerationRequest;
pub use response::{extract_text, GenerationResult};
