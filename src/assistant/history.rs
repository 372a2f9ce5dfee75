use crate::types::ChatMessage;
use std::collections::VecDeque;

/// Bounded conversation history.
///
/// Holds user/assistant turns only; the system prompt is injected per request.
/// When the bound is exceeded the oldest messages are dropped first, a whole
/// exchange at a time so the history never starts with an orphaned reply. The
/// bound is therefore effectively rounded down to whole exchanges; a bound below
/// two keeps nothing.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
}

impl ConversationHistory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages,
        }
    }

    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push_back(ChatMessage::user(user));
        self.messages.push_back(ChatMessage::assistant(assistant));
        self.trim();
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

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    fn trim(&mut self) {
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
            // keep the history aligned on a user turn
            while self.messages.front().is_some_and(|m| !m.is_user()) {
                self.messages.pop_front();
            }
        }
    }
}
