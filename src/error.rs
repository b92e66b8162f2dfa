use crate::types::AssistantError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The assistant did not report ready before the configured timeout.
    #[error("assistant was not ready before the initialization timeout")]
    InitializationTimeout,
    /// The assistant refused to start a conversation.
    #[error("failed to start conversation: {0}")]
    SessionStart(AssistantError),
    /// The conversation reported an error, either as an `error` event or on `ended`.
    #[error("conversation failed: {0}")]
    Conversation(AssistantError),
    #[error("assistant closed the conversation unexpectedly")]
    AssistantClosed,
}

impl Error {
    /// The assistant's own error, if this failure came from the assistant.
    pub fn assistant_error(&self) -> Option<&AssistantError> {
        match self {
            Error::SessionStart(err) | Error::Conversation(err) => Some(err),
            _ => None,
        }
    }
}
