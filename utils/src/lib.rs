//! Helpers for consuming the assistant's `audio-data` payloads downstream.

pub mod audio;
pub mod playback;
