//! UI-agnostic state for a group's chat channel
//!
//! Messages live only as long as the screen that owns them. There is no
//! transport; sending appends locally.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A chat message in a group channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

/// Who posted a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    System,
    You,
}

impl Sender {
    pub fn display_name(&self) -> &str {
        match self {
            Sender::System => "System",
            Sender::You => "You",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatLog {
    /// A fresh channel greeting the group.
    pub fn for_group(group_id: &str) -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        log.push(Sender::System, format!("Welcome to group {} chat!", group_id));
        log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message from the current user, trimmed. Blank drafts are
    /// ignored.
    pub fn send(&mut self, draft: &str) -> Option<&ChatMessage> {
        let content = draft.trim();
        if content.is_empty() {
            return None;
        }
        self.push(Sender::You, content.to_string());
        self.messages.last()
    }

    fn push(&mut self, sender: Sender, content: String) {
        self.messages.push(ChatMessage {
            id: self.next_id.to_string(),
            content,
            sender,
            timestamp: Local::now(),
        });
        self.next_id += 1;
    }
}
