pub mod amdf;
pub mod file;
pub mod voice;

use crate::audio::amdf::{AmdfConfig, F0Contour};
use crate::error::{PitchError, PitchResult};
use tracing::debug;

/// Mono audio held in native amplitude units (16-bit PCM values stay in
/// `-32768..=32767`). Immutable once constructed.
#[derive(Clone, Debug)]
pub struct Signal {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl Signal {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> PitchResult<Self> {
        if sample_rate == 0 {
            return Err(PitchError::input("sample rate must be > 0"));
        }
        if samples.is_empty() {
            return Err(PitchError::input("signal contains no samples"));
        }
        debug!(sample_rate, n_samples = samples.len(), "Created signal");
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Runs the AMDF pipeline over this signal.
    pub fn estimate_f0(&self, config: &AmdfConfig) -> PitchResult<F0Contour> {
        amdf::estimate_contour(self, config)
    }
}
