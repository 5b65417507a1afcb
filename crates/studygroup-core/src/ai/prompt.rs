/// How a question is framed before it is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// The question is sent as typed (group assistant modal).
    General,
    /// The question is wrapped in a tutoring preamble (per-question helper).
    Tutor,
}

const TUTOR_PREAMBLE: &str =
    "As a helpful academic tutor, please provide a clear, step-by-step explanation for this question: ";

impl PromptStyle {
    pub fn display_name(&self) -> &'static str {
        match self {
            PromptStyle::General => "AI Assistant",
            PromptStyle::Tutor => "AI Tutor",
        }
    }

    /// Text of the single user message for `question`.
    pub fn render(&self, question: &str) -> String {
        match self {
            PromptStyle::General => question.to_string(),
            PromptStyle::Tutor => format!("{}{}", TUTOR_PREAMBLE, question),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_sends_question_verbatim() {
        assert_eq!(PromptStyle::General.render("  What is 2+2? "), "  What is 2+2? ");
    }

    #[test]
    fn test_tutor_wraps_question() {
        let text = PromptStyle::Tutor.render("Solve x^2 = 4");
        assert!(text.starts_with("As a helpful academic tutor"));
        assert!(text.ends_with("for this question: Solve x^2 = 4"));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PromptStyle::General.display_name(), "AI Assistant");
        assert_eq!(PromptStyle::Tutor.display_name(), "AI Tutor");
    }
}
