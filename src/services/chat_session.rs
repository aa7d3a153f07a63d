//! Conversation log for the insights chat.
//!
//! At most one question is in flight. The user message is appended before the
//! request goes out, and exactly one assistant message is appended when it
//! settles, whatever the outcome.

use crate::error::AppError;
use crate::models::{ChatMessage, InsightQuery, InsightReply};
use crate::services::insight_client::InsightService;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Shown when the service answered but said nothing usable.
pub const EMPTY_REPLY_MESSAGE: &str =
    "I couldn't come up with an answer to that. Could you try rephrasing your question?";

/// Shown when the service could not be reached.
pub const UNREACHABLE_MESSAGE: &str = "Sorry, I'm having trouble reaching the insight service. \
     Please make sure the backend server is running and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSessionLog {
    id: Uuid,
    state: ChatState,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSessionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSessionLog {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ChatState::Idle,
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state == ChatState::AwaitingResponse
    }

    /// Record a user question and start waiting for the reply.
    ///
    /// Returns the trimmed question to send, or `None` if the text is blank or
    /// a previous question is still unanswered. Rejected input leaves the log
    /// untouched.
    pub fn submit(&mut self, text: &str) -> Option<String> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        if self.is_awaiting_response() {
            debug!(session = %self.id, "Question rejected, a reply is still pending");
            return None;
        }

        self.messages.push(ChatMessage::user(query));
        self.state = ChatState::AwaitingResponse;
        Some(query.to_string())
    }

    /// Append the reply to the pending question. Ignored when nothing is pending.
    pub fn complete(&mut self, reply: &InsightReply) -> bool {
        if !self.is_awaiting_response() {
            return false;
        }

        let content = reply.display_text().unwrap_or(EMPTY_REPLY_MESSAGE);
        self.messages.push(ChatMessage::assistant(content));
        self.state = ChatState::Idle;
        true
    }

    /// Append the apology for a failed question. Ignored when nothing is pending.
    pub fn fail(&mut self, error: &AppError) -> bool {
        if !self.is_awaiting_response() {
            return false;
        }

        warn!(session = %self.id, error = %error, "Chat question failed");
        self.messages.push(ChatMessage::assistant(UNREACHABLE_MESSAGE));
        self.state = ChatState::Idle;
        true
    }

    /// Submit `text`, wait for the service and record the outcome.
    pub async fn ask(&mut self, service: &dyn InsightService, text: &str, context: &str) -> bool {
        let Some(query) = self.submit(text) else {
            return false;
        };

        let query = InsightQuery {
            query,
            context: context.to_string(),
        };

        match service.ask(&query).await {
            Ok(reply) => self.complete(&reply),
            Err(e) => self.fail(&e),
        }
    }
}
