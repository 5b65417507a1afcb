//! Assistant state machine shared by the modal and the per-question helper.
//!
//! `Idle -> Pending -> Answered -> Idle`, forever. The owner drives the
//! network call: [`Assistant::submit`] hands back a [`Ticket`] and the
//! request to send, and [`Assistant::complete`] accepts the result only
//! if the ticket is still the current one.

use crate::ai::{GenerationRequest, GenerationResult, PromptStyle};
use crate::error::AssistError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssistantState {
    #[default]
    Idle,
    Pending,
    Answered(GenerationResult),
}

/// Identifies one submission of one assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assistant {
    style: PromptStyle,
    input: String,
    state: AssistantState,
    epoch: u64,
}

impl Assistant {
    pub fn new(style: PromptStyle) -> Self {
        Self {
            style,
            input: String::new(),
            state: AssistantState::Idle,
            epoch: 0,
        }
    }

    pub fn style(&self) -> PromptStyle {
        self.style
    }

    pub fn state(&self) -> &AssistantState {
        &self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editable only while idle; the input form is hidden otherwise.
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self.state {
            AssistantState::Idle => Some(&mut self.input),
            _ => None,
        }
    }

    pub fn set_input(&mut self, text: &str) {
        if let Some(input) = self.input_mut() {
            *input = text.to_string();
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AssistantState::Pending)
    }

    /// The answer or fallback text once answered.
    pub fn result(&self) -> Option<&GenerationResult> {
        match &self.state {
            AssistantState::Answered(result) => Some(result),
            _ => None,
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, AssistantState::Idle) && !self.input.trim().is_empty()
    }

    /// Move to `Pending` and return the request to send.
    ///
    /// Blank input leaves the assistant idle. Submitting while a request is
    /// in flight or an answer is shown is refused.
    pub fn submit(&mut self) -> Result<(Ticket, GenerationRequest), AssistError> {
        match self.state {
            AssistantState::Idle => {}
            AssistantState::Pending | AssistantState::Answered(_) => return Err(AssistError::Busy),
        }

        let request = GenerationRequest::build(self.style, &self.input)?;
        self.epoch += 1;
        self.state = AssistantState::Pending;
        Ok((Ticket(self.epoch), request))
    }

    /// Deliver a result. Returns false (and changes nothing) when the ticket
    /// is stale or nothing is pending.
    pub fn complete(&mut self, ticket: Ticket, result: GenerationResult) -> bool {
        if !self.is_pending() || ticket != Ticket(self.epoch) {
            tracing::debug!(?ticket, "discarding stale assistant result");
            return false;
        }
        self.state = AssistantState::Answered(result);
        true
    }

    /// "Ask another question": back to `Idle` with input and result cleared.
    /// Only valid from `Answered`.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.state, AssistantState::Answered(_)) {
            return false;
        }
        self.input.clear();
        self.state = AssistantState::Idle;
        true
    }

    /// Abandon an in-flight request. Any later completion for its ticket is
    /// ignored.
    pub fn cancel(&mut self) {
        if self.is_pending() {
            self.epoch += 1;
            self.state = AssistantState::Idle;
        }
    }
}
