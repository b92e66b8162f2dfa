//! Async adapter over a voice assistant client.
//!
//! `GoogleHome` waits for the assistant to become ready (optionally with a
//! timeout) and turns each text query, including any follow ups the
//! assistant asks for, into a single awaitable call.

mod assistant;
mod conversation;
mod error;
mod home;

pub use google_home_types as types;
pub use assistant::{Assistant, ReadyRx, ReadyTx};
pub use conversation::{Conversation, ConversationInput, EventStream, InputRx, InputTx};
pub use error::{Error, Result};
pub use home::{ConfigError, EventRx, GoogleHome, HomeConfig, HomeConfigBuilder, ReadinessState, Stats, TurnEvent};

#[cfg(feature = "utils")]
pub use google_home_utils as utils;
