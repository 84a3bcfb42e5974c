#[cfg(test)]
#[path = "chat_surface_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Author;
use crate::domain::models::ChatMode;
use crate::domain::models::ClearOutcome;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::QueryOutcome;

pub const QUERY_REJECTED_TEXT: &str =
    "Sorry, I encountered an error while processing your request.";
pub const SERVER_UNREACHABLE_TEXT: &str =
    "Sorry, I couldn't connect to the server. Please try again later.";

/// One mode's conversation state. The message list is newest first: locally
/// created messages are prepended, and any successful server response
/// replaces the whole list with the ordering the server returned.
pub struct ChatSurface {
    pub mode: ChatMode,
    pub messages: Vec<Message>,
    pub waiting_for_backend: bool,
}

impl ChatSurface {
    pub fn new(mode: ChatMode) -> ChatSurface {
        return ChatSurface {
            mode,
            messages: vec![],
            waiting_for_backend: false,
        };
    }

    /// Optimistically records the user's question before the round trip
    /// starts. Returns false, leaving the state untouched, when the input is
    /// blank or a response is still outstanding; the caller must not issue a
    /// request in that case.
    pub fn begin_send(&mut self, text: &str) -> bool {
        if self.waiting_for_backend || text.trim().is_empty() {
            return false;
        }

        self.messages.insert(0, Message::new(Author::User, text));
        self.waiting_for_backend = true;
        return true;
    }

    /// Reconciles a finished query round trip. A successful response carries
    /// the authoritative conversation and supersedes the optimistic message;
    /// any failure keeps the optimistic message and prepends a synthetic
    /// assistant reply instead.
    pub fn apply_query_response(&mut self, res: Result<QueryOutcome>) {
        match res {
            Ok(outcome) => {
                if outcome.is_success() {
                    self.messages = outcome.chat_history;
                } else {
                    tracing::warn!(status = %outcome.status, mode = %self.mode, "query rejected");
                    self.messages.insert(
                        0,
                        Message::new_with_type(
                            Author::Assistant,
                            MessageType::Error,
                            QUERY_REJECTED_TEXT,
                        ),
                    );
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, mode = %self.mode, "query request failed");
                self.messages.insert(
                    0,
                    Message::new_with_type(
                        Author::Assistant,
                        MessageType::Error,
                        SERVER_UNREACHABLE_TEXT,
                    ),
                );
            }
        }

        self.waiting_for_backend = false;
    }

    /// Applies an initial or refreshed history fetch. Only a successful
    /// response touches the list; failures are logged and the current state
    /// stands.
    pub fn apply_history(&mut self, res: Result<QueryOutcome>) {
        match res {
            Ok(outcome) => {
                if outcome.is_success() {
                    self.messages = outcome.chat_history;
                } else {
                    tracing::warn!(status = %outcome.status, mode = %self.mode, "history fetch rejected");
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, mode = %self.mode, "failed to fetch chat history");
            }
        }
    }

    /// Applies a clear round trip. The list only resets once the server
    /// confirms; on any failure it is left as-is.
    pub fn apply_clear(&mut self, res: Result<ClearOutcome>) {
        match res {
            Ok(outcome) => {
                if outcome.is_success() {
                    self.messages = vec![];
                } else {
                    tracing::warn!(status = %outcome.status, mode = %self.mode, "clear rejected");
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, mode = %self.mode, "failed to clear chat history");
            }
        }
    }
}
