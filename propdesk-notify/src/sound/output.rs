//! Device output for alert cues
//!
//! Opens the default output device, plays a mono buffer on every channel,
//! and returns once the buffer has drained. Compiled only with the `audio`
//! feature; otherwise every call reports the output as unavailable.

use crate::error::{Error, Result};

#[cfg(feature = "audio")]
pub fn play_mono(samples: &[f32], sample_rate: u32) -> Result<()> {
    use super::clip::resample_linear;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::SampleFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    if samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("No default output device found".to_string()))?;

    let supported = device
        .default_output_config()
        .map_err(|e| Error::Audio(format!("Failed to get default config: {}", e)))?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;
    let device_rate = config.sample_rate.0;

    let buffer = Arc::new(resample_linear(samples, sample_rate, device_rate));
    let position = Arc::new(AtomicUsize::new(0));
    let frames = buffer.len();

    fn fill<T: Copy>(
        data: &mut [T],
        channels: usize,
        buffer: &[f32],
        position: &AtomicUsize,
        silence: T,
        convert: impl Fn(f32) -> T,
    ) {
        for frame in data.chunks_mut(channels) {
            let index = position.fetch_add(1, Ordering::Relaxed);
            let value = buffer.get(index).map(|v| convert(v.clamp(-1.0, 1.0)));
            for slot in frame.iter_mut() {
                *slot = value.unwrap_or(silence);
            }
        }
    }

    fn stream_error(err: cpal::StreamError) {
        tracing::trace!("Alert stream error: {}", err);
    }

    let stream = match sample_format {
        SampleFormat::F32 => {
            let (buffer, position) = (Arc::clone(&buffer), Arc::clone(&position));
            device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill(data, channels, &buffer, &position, 0.0, |v| v)
                },
                stream_error,
                None,
            )
        }
        SampleFormat::I16 => {
            let (buffer, position) = (Arc::clone(&buffer), Arc::clone(&position));
            device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    fill(data, channels, &buffer, &position, 0, |v| {
                        (v * i16::MAX as f32) as i16
                    })
                },
                stream_error,
                None,
            )
        }
        SampleFormat::U16 => {
            let (buffer, position) = (Arc::clone(&buffer), Arc::clone(&position));
            device.build_output_stream(
                &config,
                move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                    // [-1.0, 1.0] -> [0, 65535]
                    fill(data, channels, &buffer, &position, 32_768, |v| {
                        ((v + 1.0) * 32_767.5) as u16
                    })
                },
                stream_error,
                None,
            )
        }
        other => {
            return Err(Error::Audio(format!("Unsupported sample format: {:?}", other)));
        }
    }
    .map_err(|e| Error::Audio(format!("Failed to build stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| Error::Audio(format!("Failed to start stream: {}", e)))?;

    let drain = Duration::from_millis(frames as u64 * 1000 / device_rate.max(1) as u64);
    std::thread::sleep(drain + Duration::from_millis(50));
    Ok(())
}

#[cfg(not(feature = "audio"))]
pub fn play_mono(_samples: &[f32], _sample_rate: u32) -> Result<()> {
    Err(Error::Audio(
        "built without the `audio` feature; no output device".to_string(),
    ))
}
