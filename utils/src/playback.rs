use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd};
use rubato::{FastFixedIn, Resampler};

use crate::audio;

/// Feeds decoded `audio-data` payloads into a ring buffer for an audio device to drain.
pub struct PlaybackWriter {
    resampler: Option<FastFixedIn<f32>>,
    ratio: f64,
    chunk_size: usize,
    /// Input samples waiting for a full chunk. Always shorter than `chunk_size`.
    pending: Vec<f32>,
    producer: HeapProd<f32>,
}

impl PlaybackWriter {
    /// Decodes a LINEAR16 payload, resamples it and queues it.
    ///
    /// When resampling, only whole chunks go through the resampler; the tail
    /// waits for the next payload or for `flush`. Returns how many samples
    /// were queued. Samples that do not fit are dropped.
    pub fn push_linear16(&mut self, bytes: &[u8]) -> anyhow::Result<usize> {
        let samples = audio::decode_linear16(bytes);
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(self.queue(&samples));
        };

        self.pending.extend(samples);
        let whole = self.pending.len() - self.pending.len() % self.chunk_size;
        let mut out = Vec::with_capacity((whole as f64 * self.ratio).ceil() as usize);
        for chunk in self.pending[..whole].chunks_exact(self.chunk_size) {
            let mut frames = resampler.process(&[chunk], None)?;
            if let Some(channel) = frames.pop() {
                out.extend(channel);
            }
        }
        self.pending.drain(..whole);

        Ok(self.queue(&out))
    }

    /// Resamples and queues whatever is left over, ex: at the end of a turn.
    pub fn flush(&mut self) -> anyhow::Result<usize> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(0);
        };
        if self.pending.is_empty() {
            return Ok(0);
        }

        let expected = (self.pending.len() as f64 * self.ratio).round() as usize;
        let mut frames = resampler.process_partial(Some(&[self.pending.as_slice()]), None)?;
        self.pending.clear();

        // The resampler pads a partial chunk with silence; keep only the real part.
        let mut out = frames.pop().unwrap_or_default();
        out.truncate(expected);
        Ok(self.queue(&out))
    }

    fn queue(&mut self, samples: &[f32]) -> usize {
        let queued = self.producer.push_slice(samples);
        if queued < samples.len() {
            tracing::warn!("playback buffer full, dropped {} samples", samples.len() - queued);
        }
        queued
    }
}

/// Creates a writer/reader pair converting from `in_rate` (the assistant's output
/// rate) to `out_rate` (the device rate).
pub fn playback_channel(
    in_rate: f64,
    out_rate: f64,
    chunk_size: usize,
    capacity: usize,
) -> anyhow::Result<(PlaybackWriter, HeapCons<f32>)> {
    if chunk_size == 0 {
        anyhow::bail!("chunk_size must be greater than zero");
    }
    let resampler = if in_rate == out_rate {
        None
    } else {
        Some(audio::create_resampler(in_rate, out_rate, chunk_size)?)
    };
    let (producer, consumer) = audio::shared_buffer(capacity).split();

    Ok((
        PlaybackWriter {
            resampler,
            ratio: out_rate / in_rate,
            chunk_size,
            pending: Vec::with_capacity(chunk_size),
            producer,
        },
        consumer,
    ))
}
