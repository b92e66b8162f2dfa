use crate::error::AssistantError;

/// Everything a running conversation can emit.
///
/// Serialized adjacently tagged, using the assistant's event names
/// (`audio-data`, `end-of-utterance`, ...) as the tag.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ConversationEvent {
    /// Encoded audio from the assistant, in the configured output encoding.
    AudioData(Vec<u8>),
    /// The assistant stopped listening.
    EndOfUtterance,
    Transcription(TranscriptionEvent),
    /// Text the assistant said back.
    Response(String),
    /// Volume change requested by the assistant, 1 to 100.
    VolumePercent(u8),
    DeviceAction(serde_json::Value),
    /// Only sent when the conversation was started with the screen on.
    ScreenData(ScreenDataEvent),
    Ended(EndedEvent),
    Error(AssistantError),
}

impl ConversationEvent {
    pub fn ended(error: Option<AssistantError>, continue_conversation: bool) -> Self {
        ConversationEvent::Ended(EndedEvent {
            error,
            continue_conversation,
        })
    }

    pub fn transcription(transcription: &str, done: bool) -> Self {
        ConversationEvent::Transcription(TranscriptionEvent {
            transcription: transcription.to_string(),
            done,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConversationEvent::AudioData(_) => "audio-data",
            ConversationEvent::EndOfUtterance => "end-of-utterance",
            ConversationEvent::Transcription(_) => "transcription",
            ConversationEvent::Response(_) => "response",
            ConversationEvent::VolumePercent(_) => "volume-percent",
            ConversationEvent::DeviceAction(_) => "device-action",
            ConversationEvent::ScreenData(_) => "screen-data",
            ConversationEvent::Ended(_) => "ended",
            ConversationEvent::Error(_) => "error",
        }
    }

    /// `ended` and `error` close out a conversation; everything else is informational.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationEvent::Ended(_) | ConversationEvent::Error(_))
    }
}

/// `transcription` event
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptionEvent {
    /// The words recognised so far
    transcription: String,
    /// Whether this is the final transcription for the utterance
    done: bool,
}

impl TranscriptionEvent {
    pub fn transcription(&self) -> &str {
        &self.transcription
    }

    pub fn done(&self) -> bool {
        self.done
    }
}

/// `screen-data` event
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenDataEvent {
    /// ex: "HTML"
    format: String,
    data: Vec<u8>,
}

impl ScreenDataEvent {
    pub fn new(format: &str, data: Vec<u8>) -> Self {
        Self {
            format: format.to_string(),
            data,
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// `ended` event
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndedEvent {
    error: Option<AssistantError>,
    /// The assistant expects a follow up, so a new conversation should be started.
    continue_conversation: bool,
}

impl EndedEvent {
    pub fn error(&self) -> Option<&AssistantError> {
        self.error.as_ref()
    }

    pub fn continue_conversation(&self) -> bool {
        self.continue_conversation
    }

    pub fn into_error(self) -> Option<AssistantError> {
        self.error
    }
}
