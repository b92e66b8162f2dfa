use ringbuf::HeapRb;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

/// Rate of `audio-data` payloads with the default conversation config.
pub const ASSISTANT_OUTPUT_SAMPLE_RATE: f64 = 24000.0;
/// Rate the assistant expects for audio written to a conversation.
pub const ASSISTANT_INPUT_SAMPLE_RATE: f64 = 16000.0;

pub fn create_resampler(in_sampling_rate: f64, out_sampling_rate: f64, chunk_size: usize) -> anyhow::Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,
        PolynomialDegree::Cubic,
        chunk_size,
        1
    )?;
    Ok(resampler)
}

/// Splits mono samples into fixed size chunks, zero padding the last one.
pub fn split_for_chunks(samples: &[f32], chunk_size: usize) -> Vec<Vec<f32>> {
    samples.chunks(chunk_size).map(|chunk| {
        let mut chunk = chunk.to_vec();
        chunk.resize(chunk_size, 0.0);
        chunk
    }).collect()
}

/// Runs mono samples through a resampler created with the same `chunk_size`.
///
/// Meant for whole clips: the last chunk is zero padded. Streams should go
/// through `playback::PlaybackWriter`, which carries partial chunks over.
pub fn resample(resampler: &mut FastFixedIn<f32>, samples: &[f32], chunk_size: usize) -> anyhow::Result<Vec<f32>> {
    anyhow::ensure!(chunk_size > 0, "chunk_size must be greater than zero");
    let mut out = Vec::with_capacity(samples.len());
    for chunk in split_for_chunks(samples, chunk_size) {
        let mut frames = resampler.process(&[chunk], None)?;
        if let Some(channel) = frames.pop() {
            out.extend(channel);
        }
    }
    Ok(out)
}

pub fn shared_buffer(size: usize) -> HeapRb<f32> {
    HeapRb::new(size)
}

/// LINEAR16 (little endian signed 16 bit PCM) to f32 samples in [-1, 1].
///
/// A trailing odd byte is ignored.
pub fn decode_linear16(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(2).map(|chunk| {
        let v = i16::from_le_bytes([chunk[0], chunk[1]]);
        (v as f32 / i16::MAX as f32).clamp(-1.0, 1.0)
    }).collect()
}

/// f32 samples to LINEAR16, suitable for writing to a conversation.
pub fn encode_linear16(pcm32: &[f32]) -> Vec<u8> {
    pcm32.iter().flat_map(|&sample| {
        ((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes()
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pcm() {
        let bytes = [0x00, 0x00, 0xff, 0x7f, 0x01, 0x80, 0x42];
        let samples = decode_linear16(&bytes);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 1.0);
        assert_eq!(samples[2], -1.0);
    }

    #[test]
    fn encode_clamps_out_of_range_samples() {
        let bytes = encode_linear16(&[2.0, -2.0, 0.0]);
        assert_eq!(bytes, vec![0xff, 0x7f, 0x01, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn last_chunk_is_padded() {
        let chunks = split_for_chunks(&[1.0; 5], 4);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn upsampling_roughly_doubles_length() {
        let chunk_size = 256;
        let mut resampler = create_resampler(24000.0, 48000.0, chunk_size).expect("resampler");
        let samples = vec![0.25; chunk_size * 4];

        let out = resample(&mut resampler, &samples, chunk_size).expect("resample");
        let ratio = out.len() as f64 / samples.len() as f64;
        assert!((1.9..2.1).contains(&ratio), "unexpected ratio {}", ratio);
    }

    #[test]
    fn zero_chunk_size_is_an_error() {
        let mut resampler = create_resampler(24000.0, 48000.0, 64).expect("resampler");
        assert!(resample(&mut resampler, &[0.0; 8], 0).is_err());
    }
}
