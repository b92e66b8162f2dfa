use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use google_home::types::{AssistantError, ConversationConfig, ConversationEvent};
use google_home::{Assistant, Conversation, Error, GoogleHome, HomeConfig, ReadyRx, ReadyTx};
use google_home_utils::{audio, playback};

/// Plays back one scripted conversation per `start` call and remembers what it was asked.
struct ScriptedAssistant {
    ready_tx: ReadyTx,
    scripts: Mutex<VecDeque<Result<Vec<ConversationEvent>, AssistantError>>>,
    starts: Mutex<Vec<Option<ConversationConfig>>>,
}

impl ScriptedAssistant {
    fn new(scripts: Vec<Result<Vec<ConversationEvent>, AssistantError>>) -> Self {
        let (ready_tx, _) = tokio::sync::broadcast::channel(4);
        Self {
            ready_tx,
            scripts: Mutex::new(scripts.into()),
            starts: Mutex::new(Vec::new()),
        }
    }

    fn starts(&self) -> Vec<Option<ConversationConfig>> {
        self.starts.lock().expect("starts lock").clone()
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    fn ready_events(&self) -> ReadyRx {
        self.ready_tx.subscribe()
    }

    async fn start(&self, config: Option<ConversationConfig>) -> Result<Conversation, AssistantError> {
        self.starts.lock().expect("starts lock").push(config);
        let script = self
            .scripts
            .lock()
            .expect("scripts lock")
            .pop_front()
            .unwrap_or_else(|| Err(AssistantError::new("no script left")))?;

        // Deliver events from another task, the way a real client would.
        let (input_tx, _input_rx) = tokio::sync::mpsc::channel(8);
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(8);
        tokio::spawn(async move {
            for event in script {
                tokio::task::yield_now().await;
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(Conversation::from_receiver(input_tx, event_rx))
    }
}

#[tokio::test]
async fn waits_for_ready_then_follows_a_continuation() {
    let assistant = ScriptedAssistant::new(vec![
        Ok(vec![
            ConversationEvent::transcription("set a timer", true),
            ConversationEvent::Response("For how long?".to_string()),
            ConversationEvent::ended(None, true),
        ]),
        Ok(vec![
            ConversationEvent::Response("Timer set".to_string()),
            ConversationEvent::ended(None, false),
        ]),
    ]);
    let config = HomeConfig::builder()
        .with_paths("client.json", "tokens.json")
        .with_timeout(Duration::from_secs(5))
        .with_log_on_ready(true)
        .build();
    let home = GoogleHome::new(config, |_auth| assistant);

    home.assistant().ready_tx.send(()).expect("gate should be listening");
    home.on_init().await.expect("assistant should become ready");

    home.send_message("set a timer").await.expect("message should succeed");

    let starts = home.assistant().starts();
    assert_eq!(starts.len(), 2);
    let first = starts[0].as_ref().expect("first start carries a request");
    assert_eq!(first.text_query(), Some("set a timer"));
    assert!(first.is_new());
    assert!(starts[1].is_none(), "continuations resume without a request");
}

#[tokio::test]
async fn overlapping_messages_use_their_own_conversations() {
    let assistant = ScriptedAssistant::new(vec![
        Ok(vec![ConversationEvent::Response("one".to_string()), ConversationEvent::ended(None, false)]),
        Ok(vec![ConversationEvent::Response("two".to_string()), ConversationEvent::ended(None, false)]),
    ]);
    let home = GoogleHome::with_assistant(HomeConfig::new(), assistant);
    let mut events = home.conversation_events();

    let (a, b) = tokio::join!(home.send_message("first"), home.send_message("second"));
    assert_eq!(a, Ok(()));
    assert_eq!(b, Ok(()));

    // Events interleave on the shared stream but keep their turn.
    let mut by_turn: BTreeMap<u64, Vec<&'static str>> = BTreeMap::new();
    while let Ok(event) = events.try_recv() {
        by_turn.entry(event.turn()).or_default().push(event.event().name());
    }
    assert_eq!(by_turn.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    for names in by_turn.values() {
        assert_eq!(names, &vec!["response", "ended"]);
    }

    let stats = home.stats();
    assert_eq!(stats.sessions_started(), 2);
    assert_eq!(stats.turns_completed(), 2);
}

#[tokio::test]
async fn error_is_surfaced_with_its_details() {
    let err = AssistantError::new("RESOURCE_EXHAUSTED")
        .with_code(8)
        .with_details(serde_json::json!({ "retryAfterSeconds": 30 }));
    let assistant = ScriptedAssistant::new(vec![Ok(vec![ConversationEvent::Error(err.clone())])]);
    let home = GoogleHome::with_assistant(HomeConfig::new(), assistant);

    let failure = home.send_message("hello").await.expect_err("message should fail");
    assert_eq!(failure, Error::Conversation(err));
    assert_eq!(
        failure.assistant_error().and_then(|e| e.details()).map(|d| d["retryAfterSeconds"].clone()),
        Some(serde_json::json!(30))
    );
    assert_eq!(home.stats().turns_failed(), 1);
}

#[tokio::test]
async fn audio_can_be_played_from_the_event_stream() {
    let pcm = audio::encode_linear16(&[0.5; 64]);
    let assistant = ScriptedAssistant::new(vec![Ok(vec![
        ConversationEvent::AudioData(pcm.clone()),
        ConversationEvent::AudioData(pcm),
        ConversationEvent::ended(None, false),
    ])]);
    let home = GoogleHome::with_assistant(HomeConfig::new(), assistant);
    let mut events = home.conversation_events();

    home.send_message("play something").await.expect("message should succeed");

    let (mut writer, _reader) = playback::playback_channel(24000.0, 24000.0, 64, 1024).expect("playback channel");
    let mut queued = 0;
    while let Ok(event) = events.try_recv() {
        if let ConversationEvent::AudioData(bytes) = event.into_event() {
            queued += writer.push_linear16(&bytes).expect("push audio");
        }
    }
    assert_eq!(queued, 128);
}
