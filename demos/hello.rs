//! Runs `GoogleHome` against a tiny in-process assistant that answers every
//! query with an echo, asking for one follow up the first time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use google_home::types::{AssistantError, ConversationConfig, ConversationEvent};
use google_home::{Assistant, Conversation, GoogleHome, HomeConfig, ReadyRx, ReadyTx};
use tracing_subscriber::fmt::time::ChronoLocal;

struct EchoAssistant {
    ready_tx: ReadyTx,
    asked_follow_up: AtomicBool,
}

#[async_trait]
impl Assistant for EchoAssistant {
    fn ready_events(&self) -> ReadyRx {
        self.ready_tx.subscribe()
    }

    async fn start(&self, config: Option<ConversationConfig>) -> Result<Conversation, AssistantError> {
        let reply = match config.as_ref().and_then(|c| c.text_query()) {
            Some(text) => format!("You said: {}", text),
            None => "Following up.".to_string(),
        };
        let follow_up = !self.asked_follow_up.swap(true, Ordering::SeqCst);

        Ok(Conversation::from_events(vec![
            ConversationEvent::Response(reply),
            ConversationEvent::ended(None, follow_up),
        ]))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let config = HomeConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("{}, using defaults", e);
        HomeConfig::builder()
            .with_timeout(Duration::from_secs(5))
            .with_log_on_ready(true)
            .build()
    });

    let home = GoogleHome::new(config, |auth| {
        tracing::info!("connecting with key file {:?}", auth.key_file_path());
        let (ready_tx, _) = tokio::sync::broadcast::channel(1);
        EchoAssistant {
            ready_tx,
            asked_follow_up: AtomicBool::new(false),
        }
    });

    let mut events = home.conversation_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let turn = event.turn();
            if let ConversationEvent::Response(text) = event.into_event() {
                println!("assistant ({}): {}", turn, text);
            }
        }
    });

    home.assistant().ready_tx.send(()).ok();
    home.on_init().await?;

    home.send_message("Hello!").await?;
    println!("{:?}", home.stats());
    Ok(())
}
