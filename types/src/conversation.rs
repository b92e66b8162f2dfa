use crate::audio::AudioConfig;

pub const DEFAULT_LANG: &str = "en-US";

/// Parameters for one conversation turn, handed to the assistant's `start`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationConfig {
    audio: AudioConfig,

    /// Language code for input and output, ex: "en-AU"
    lang: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    device_model_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    device_location: Option<DeviceLocation>,

    /// When `is_on` is set the assistant may emit `screen-data` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    screen: Option<ScreenConfig>,

    /// If set, audio input is ignored and this text is used as the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    text_query: Option<String>,

    /// Force a new conversation and ignore any previous state.
    #[serde(default)]
    is_new: bool,
}

impl ConversationConfig {
    pub fn builder() -> ConversationConfigBuilder {
        ConversationConfigBuilder::new()
    }

    pub fn audio(&self) -> &AudioConfig {
        &self.audio
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn device_model_id(&self) -> Option<&str> {
        self.device_model_id.as_deref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn device_location(&self) -> Option<&DeviceLocation> {
        self.device_location.as_ref()
    }

    pub fn screen(&self) -> Option<&ScreenConfig> {
        self.screen.as_ref()
    }

    pub fn screen_enabled(&self) -> bool {
        self.screen.as_ref().is_some_and(|screen| screen.is_on)
    }

    pub fn text_query(&self) -> Option<&str> {
        self.text_query.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

pub struct ConversationConfigBuilder {
    config: ConversationConfig,
}

impl Default for ConversationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConversationConfig {
                audio: AudioConfig::default(),
                lang: DEFAULT_LANG.to_string(),
                device_model_id: None,
                device_id: None,
                device_location: None,
                screen: None,
                text_query: None,
                is_new: false,
            },
        }
    }

    pub fn with_audio(mut self, audio: AudioConfig) -> Self {
        self.config.audio = audio;
        self
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.config.lang = lang.to_string();
        self
    }

    pub fn with_device(mut self, device_model_id: &str, device_id: &str) -> Self {
        self.config.device_model_id = Some(device_model_id.to_string());
        self.config.device_id = Some(device_id.to_string());
        self
    }

    pub fn with_device_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.config.device_location = Some(DeviceLocation {
            coordinates: Coordinates { latitude, longitude },
        });
        self
    }

    pub fn with_screen(mut self, is_on: bool) -> Self {
        self.config.screen = Some(ScreenConfig { is_on });
        self
    }

    pub fn with_text_query(mut self, text: &str) -> Self {
        self.config.text_query = Some(text.to_string());
        self
    }

    pub fn with_new_conversation(mut self, is_new: bool) -> Self {
        self.config.is_new = is_new;
        self
    }

    pub fn build(self) -> ConversationConfig {
        self.config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenConfig {
    pub is_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceLocation {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
