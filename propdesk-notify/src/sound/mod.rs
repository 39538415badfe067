//! Audible cue for new notifications
//!
//! A capability-checked fallback chain: the synthesized tone first, then the
//! bundled WAV clip, then nothing. Every failure is swallowed; sound is an
//! enhancement and must never interrupt an announcement.

mod clip;
mod output;
mod tone;

pub use clip::{decode_wav, resample_linear, DecodedClip, EmbeddedClip, CLIP_WAV};
pub use tone::{synthesize_tone, SynthTone, TONE_DURATION_MS, TONE_FREQUENCY_HZ};

use crate::error::Result;
use std::sync::Arc;
use tracing::trace;

/// Something that can play the alert cue synchronously
///
/// `play` may block for the length of the cue; callers run it off the async
/// runtime.
pub trait SoundBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn play(&self) -> Result<()>;
}

/// Non-blocking alert cue used by the announcer
pub trait AlertSound: Send + Sync {
    fn emit(&self);
}

/// Ordered fallback chain of sound backends
#[derive(Clone)]
pub struct SoundChain {
    backends: Arc<Vec<Arc<dyn SoundBackend>>>,
}

impl SoundChain {
    pub fn new(backends: Vec<Arc<dyn SoundBackend>>) -> Self {
        Self {
            backends: Arc::new(backends),
        }
    }

    /// Synthesized tone, falling back to the bundled clip
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(SynthTone::default()),
            Arc::new(EmbeddedClip::default()),
        ])
    }

    /// Try each backend in order, blocking.
    ///
    /// Returns the name of the backend that played, or `None` if all failed.
    pub fn play_blocking(&self) -> Option<&'static str> {
        for backend in self.backends.iter() {
            match backend.play() {
                Ok(()) => return Some(backend.name()),
                Err(e) => trace!(backend = backend.name(), "Alert sound unavailable: {}", e),
            }
        }
        None
    }
}

impl AlertSound for SoundChain {
    fn emit(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let chain = self.clone();
        // Detached; the result is irrelevant
        drop(handle.spawn_blocking(move || {
            chain.play_blocking();
        }));
    }
}

/// Sound disabled by configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AlertSound for Silent {
    fn emit(&self) {}
}
