pub mod audio;
pub mod auth;
pub mod conversation;
pub mod events;
mod error;

pub use auth::{AuthConfig, Tokens, TokensError, TokensUpdated};
pub use conversation::{ConversationConfig, ConversationConfigBuilder};
pub use error::AssistantError;
pub use events::ConversationEvent;
