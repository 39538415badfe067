//! Synthesized alert tone
//!
//! Sine at 800 Hz with an exponential gain ramp from 0.3 down to 0.01 over
//! half a second.

use super::output;
use super::SoundBackend;
use crate::error::Result;
use std::f32::consts::PI;

pub const TONE_FREQUENCY_HZ: f32 = 800.0;
pub const TONE_DURATION_MS: u32 = 500;
const START_GAIN: f32 = 0.3;
const END_GAIN: f32 = 0.01;

/// Synthesis rate; output resamples to the device rate
const SYNTH_SAMPLE_RATE: u32 = 48_000;

/// Generate the decaying tone as mono f32 samples at `sample_rate`.
pub fn synthesize_tone(sample_rate: u32) -> Vec<f32> {
    let total = (sample_rate as u64 * TONE_DURATION_MS as u64 / 1000) as usize;
    if total == 0 {
        return Vec::new();
    }

    let ratio = END_GAIN / START_GAIN;
    (0..total)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let progress = i as f32 / total as f32;
            let gain = START_GAIN * ratio.powf(progress);
            gain * (2.0 * PI * TONE_FREQUENCY_HZ * t).sin()
        })
        .collect()
}

/// Primary backend: programmatic tone generator
#[derive(Debug, Clone, Copy)]
pub struct SynthTone {
    sample_rate: u32,
}

impl Default for SynthTone {
    fn default() -> Self {
        Self {
            sample_rate: SYNTH_SAMPLE_RATE,
        }
    }
}

impl SoundBackend for SynthTone {
    fn name(&self) -> &'static str {
        "tone"
    }

    fn play(&self) -> Result<()> {
        output::play_mono(&synthesize_tone(self.sample_rate), self.sample_rate)
    }
}
