use async_trait::async_trait;

use crate::conversation::Conversation;
use crate::types::{AssistantError, ConversationConfig};

pub type ReadyTx = tokio::sync::broadcast::Sender<()>;
pub type ReadyRx = tokio::sync::broadcast::Receiver<()>;

/// The voice assistant client `GoogleHome` drives.
///
/// Implementations own authentication, audio and transport. `GoogleHome` only
/// waits for them to become ready and starts conversations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Assistant: Send + Sync + 'static {
    /// Fires once the assistant has authenticated and can start conversations.
    fn ready_events(&self) -> ReadyRx;

    /// Starts a conversation. `None` resumes the conversation the assistant
    /// asked to continue.
    async fn start(&self, config: Option<ConversationConfig>) -> Result<Conversation, AssistantError>;
}
