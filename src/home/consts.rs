pub const KEY_FILE_PATH_VAR: &str = "GOOGLE_HOME_KEY_FILE_PATH";
pub const SAVED_TOKENS_PATH_VAR: &str = "GOOGLE_HOME_SAVED_TOKENS_PATH";
pub const TIMEOUT_MS_VAR: &str = "GOOGLE_HOME_TIMEOUT_MS";
pub const LOG_ON_READY_VAR: &str = "GOOGLE_HOME_LOG_ON_READY";

pub const LANG: &str = "en-AU";
pub const SAMPLE_RATE_IN: u32 = 16000;
pub const SAMPLE_RATE_OUT: u32 = 24000;

pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub const READY_MESSAGE: &str = "Assistant is ready!";
