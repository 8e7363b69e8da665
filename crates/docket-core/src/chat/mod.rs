//! Bounded conversation transcript for the workspace chat panel.
//!
//! The core does not talk to a model backend; it keeps the transcript the
//! panel renders and the context spans each outgoing message carried.
//! Persistence of chat sessions belongs to the host.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use docket_api::ContextSpan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry, with the context spans attached when it was sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub context: Vec<ContextSpan>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, context: Vec<ContextSpan>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
            sent_at: Utc::now(),
            context,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
            sent_at: Utc::now(),
            context: Vec::new(),
        }
    }
}

pub struct ChatThread {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
}

impl ChatThread {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages: 100,
        }
    }

    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        self.trim_if_needed();
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim_if_needed(&mut self) {
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }
}

impl Default for ChatThread {
    fn default() -> Self {
        Self::new()
    }
}
