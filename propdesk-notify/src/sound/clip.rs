//! Pre-encoded fallback clip

use super::output;
use super::SoundBackend;
use crate::error::{Error, Result};
use hound::{SampleFormat, WavReader};
use once_cell::sync::Lazy;
use std::io::Cursor;

/// 300 ms, 16 kHz mono, 16-bit PCM chime bundled with the binary
pub static CLIP_WAV: &[u8] = include_bytes!("../../assets/notification.wav");

static DECODED_CLIP: Lazy<std::result::Result<DecodedClip, String>> =
    Lazy::new(|| decode_wav(CLIP_WAV).map_err(|e| e.to_string()));

/// Mono f32 samples decoded from a WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl DecodedClip {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}

/// Decode a WAV byte buffer, downmixing to mono.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedClip> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| Error::Audio(format!("Invalid WAV clip: {}", e)))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("WAV decode error: {}", e)))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Audio(format!("WAV decode error: {}", e)))?
        }
    };

    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(DecodedClip {
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Linear-interpolation resampler, good enough for a short chime.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let out_len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let step = from_rate as f64 / to_rate as f64;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            samples[idx] + (samples[next] - samples[idx]) * frac
        })
        .collect()
}

/// Fallback backend: the bundled clip
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedClip;

impl SoundBackend for EmbeddedClip {
    fn name(&self) -> &'static str {
        "clip"
    }

    fn play(&self) -> Result<()> {
        let clip = DECODED_CLIP.as_ref().map_err(|e| Error::Audio(e.clone()))?;
        output::play_mono(&clip.samples, clip.sample_rate)
    }
}
