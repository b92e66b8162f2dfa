use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::assistant::Assistant;
use crate::conversation::Conversation;
use crate::error::{Error, Result};
use crate::types::audio::{AudioConfig, AudioEncoding};
use crate::types::{AuthConfig, ConversationConfig, ConversationEvent};

mod config;
mod consts;
mod readiness;
mod stats;

pub use config::{ConfigError, HomeConfig, HomeConfigBuilder};
pub use readiness::ReadinessState;
pub use stats::Stats;

use readiness::ReadinessGate;

type EventTx = tokio::sync::broadcast::Sender<TurnEvent>;
pub type EventRx = tokio::sync::broadcast::Receiver<TurnEvent>;

/// A conversation event tagged with the `send_message` call it belongs to.
///
/// Continuations keep the turn id of the message that started them.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnEvent {
    turn: u64,
    event: ConversationEvent,
}

impl TurnEvent {
    /// Ids start at 1 and increase with every `send_message` call.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn event(&self) -> &ConversationEvent {
        &self.event
    }

    pub fn into_event(self) -> ConversationEvent {
        self.event
    }
}

/// How a single conversation finished, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnOutcome {
    Finished,
    Continue,
}

/// Sends text queries to a voice assistant and waits for each exchange to finish.
pub struct GoogleHome<A: Assistant> {
    config: HomeConfig,
    assistant: A,
    readiness: Arc<ReadinessGate>,
    events_tx: EventTx,
    next_turn: AtomicU64,
    stats: Arc<Mutex<Stats>>,
}

impl<A: Assistant> GoogleHome<A> {
    /// Builds the assistant from the auth section of `config` and starts
    /// watching for it to become ready. Must be called inside a tokio runtime.
    pub fn new<F>(config: HomeConfig, connect: F) -> Self
    where
        F: FnOnce(&AuthConfig) -> A,
    {
        let assistant = connect(config.auth());
        Self::with_assistant(config, assistant)
    }

    pub fn with_assistant(config: HomeConfig, assistant: A) -> Self {
        let readiness = ReadinessGate::spawn(assistant.ready_events(), config.timeout(), config.log_on_ready());
        let (events_tx, _) = tokio::sync::broadcast::channel(consts::EVENT_CHANNEL_CAPACITY);

        Self {
            config,
            assistant,
            readiness,
            events_tx,
            next_turn: AtomicU64::new(1),
            stats: Arc::new(Mutex::new(Stats::new())),
        }
    }

    /// Resolves once the assistant is ready, or fails with
    /// `Error::InitializationTimeout`. Every call sees the same outcome.
    pub fn on_init(&self) -> impl Future<Output = Result<()>> + Send + 'static {
        self.readiness.wait()
    }

    pub fn readiness(&self) -> ReadinessState {
        self.readiness.state()
    }

    /// Every event of every conversation, as it is received. Overlapping
    /// `send_message` calls share this stream; use `TurnEvent::turn` to tell
    /// them apart.
    pub fn conversation_events(&self) -> EventRx {
        self.events_tx.subscribe()
    }

    pub fn stats(&self) -> Stats {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn config(&self) -> &HomeConfig {
        &self.config
    }

    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Sends `message` as a text query and waits until the assistant is done,
    /// following any continuations it asks for.
    pub async fn send_message(&self, message: &str) -> Result<()> {
        let turn = self.next_turn.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("sending message {}: {:?}", turn, message);

        let result = self.converse(turn, conversation_config(message)).await;
        if let Err(ref e) = result {
            tracing::warn!("conversation failed: {}", e);
        }

        self.record(|stats| stats.record_turn(result.is_ok()));
        result
    }

    async fn converse(&self, turn: u64, config: ConversationConfig) -> Result<()> {
        let mut conversation = self.start_conversation(Some(config)).await?;
        loop {
            match self.handle_response(turn, &mut conversation).await? {
                TurnOutcome::Finished => return Ok(()),
                TurnOutcome::Continue => {
                    tracing::debug!("assistant asked to continue, starting a new conversation");
                    self.record(Stats::record_continuation);
                    conversation = self.start_conversation(None).await?;
                }
            }
        }
    }

    async fn start_conversation(&self, config: Option<ConversationConfig>) -> Result<Conversation> {
        let conversation = self.assistant.start(config).await.map_err(|e| {
            tracing::error!("failed to start conversation: {}", e);
            Error::SessionStart(e)
        })?;

        self.record(Stats::record_session_started);
        Ok(conversation)
    }

    async fn handle_response(&self, turn: u64, conversation: &mut Conversation) -> Result<TurnOutcome> {
        while let Some(event) = conversation.next_event().await {
            tracing::debug!("received event {} for message {}", event.name(), turn);
            self.publish(turn, &event);

            match event {
                ConversationEvent::Ended(ended) => {
                    let continue_conversation = ended.continue_conversation();
                    return match ended.into_error() {
                        Some(e) => Err(Error::Conversation(e)),
                        None if continue_conversation => Ok(TurnOutcome::Continue),
                        None => Ok(TurnOutcome::Finished),
                    };
                }
                ConversationEvent::Error(e) => return Err(Error::Conversation(e)),
                _ => {}
            }
        }

        Err(Error::AssistantClosed)
    }

    fn publish(&self, turn: u64, event: &ConversationEvent) {
        if self.events_tx.receiver_count() == 0 {
            return;
        }
        let event = TurnEvent {
            turn,
            event: event.clone(),
        };
        if let Err(e) = self.events_tx.send(event) {
            tracing::error!("failed to publish event: {}", e);
        }
    }

    fn record(&self, update: impl FnOnce(&mut Stats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut *stats);
    }
}

/// The request every `send_message` starts with.
fn conversation_config(text: &str) -> ConversationConfig {
    let audio = AudioConfig::new()
        .with_input(AudioEncoding::Linear16, consts::SAMPLE_RATE_IN)
        .with_output(AudioEncoding::Linear16, consts::SAMPLE_RATE_OUT);

    ConversationConfig::builder()
        .with_audio(audio)
        .with_lang(consts::LANG)
        .with_text_query(text)
        .with_new_conversation(true)
        .build()
}
