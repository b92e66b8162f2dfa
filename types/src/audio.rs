mod consts;

pub use consts::*;

/// Audio settings for one conversation: what we send and what we want back.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    /// Encoding of audio written to the conversation. Supported: LINEAR16, FLAC.
    encoding_in: AudioEncoding,
    /// Between 16000 and 24000.
    sample_rate_in: u32,
    /// Encoding of `audio-data` payloads. Supported: LINEAR16, MP3, OPUS_IN_OGG.
    encoding_out: AudioEncoding,
    /// 16000 or 24000.
    sample_rate_out: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            encoding_in: AudioEncoding::Linear16,
            sample_rate_in: DEFAULT_SAMPLE_RATE_IN,
            encoding_out: AudioEncoding::Linear16,
            sample_rate_out: DEFAULT_SAMPLE_RATE_OUT,
        }
    }
}

impl AudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, encoding: AudioEncoding, sample_rate: u32) -> Self {
        self.encoding_in = encoding;
        self.sample_rate_in = sample_rate;
        self
    }

    pub fn with_output(mut self, encoding: AudioEncoding, sample_rate: u32) -> Self {
        self.encoding_out = encoding;
        self.sample_rate_out = sample_rate;
        self
    }

    pub fn encoding_in(&self) -> AudioEncoding {
        self.encoding_in
    }

    pub fn sample_rate_in(&self) -> u32 {
        self.sample_rate_in
    }

    pub fn encoding_out(&self) -> AudioEncoding {
        self.encoding_out
    }

    pub fn sample_rate_out(&self) -> u32 {
        self.sample_rate_out
    }
}
