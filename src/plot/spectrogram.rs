use crate::error::{PitchError, PitchResult};
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use tracing::debug;

/// Analysis window is `sample_rate / SPECTROGRAM_WINDOW_DIVISOR` samples.
pub const SPECTROGRAM_WINDOW_DIVISOR: u32 = 20;
pub const SPECTROGRAM_MAX_HZ: f32 = 5000.0;

fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            0.5 - 0.5 * (2.0 * std::f32::consts::PI * x).cos()
        })
        .collect()
}

/// Short-time power spectrum in dB. Frames hop by half a window.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    power_db: Vec<Vec<f32>>,
    n_fft: usize,
    hop: usize,
    sample_rate: u32,
}

impl Spectrogram {
    pub fn compute(samples: &[f32], sample_rate: u32, n_fft: usize) -> PitchResult<Self> {
        if n_fft < 2 {
            return Err(PitchError::configuration(format!(
                "spectrogram window must be at least 2 samples, got {n_fft}"
            )));
        }
        let hop = n_fft / 2;
        let n_frames = if samples.len() <= n_fft {
            1
        } else {
            1 + (samples.len() - n_fft) / hop
        };

        let window = hann_window(n_fft);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let mut buffer = vec![Complex::new(0.0, 0.0); n_fft];

        let mut power_db: Vec<Vec<f32>> = Vec::with_capacity(n_frames);
        for frame in 0..n_frames {
            let start = frame * hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let sample = samples.get(start + i).copied().unwrap_or(0.0);
                *slot = Complex::new(sample * window[i], 0.0);
            }
            fft.process(&mut buffer);
            power_db.push(
                buffer[..=n_fft / 2]
                    .iter()
                    .map(|c| 10.0 * (c.norm_sqr() + 1e-10).log10())
                    .collect(),
            );
        }
        debug!(n_frames, n_fft, hop, "Computed spectrogram");

        Ok(Self {
            power_db,
            n_fft,
            hop,
            sample_rate,
        })
    }

    /// Default window: a twentieth of a second.
    pub fn default_window(sample_rate: u32) -> usize {
        (sample_rate / SPECTROGRAM_WINDOW_DIVISOR) as usize
    }

    pub fn power_db(&self) -> &[Vec<f32>] {
        &self.power_db
    }

    pub fn n_frames(&self) -> usize {
        self.power_db.len()
    }

    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.n_fft as f32
    }

    /// Start time of a frame in seconds.
    pub fn frame_start_time(&self, frame: usize) -> f64 {
        (frame * self.hop) as f64 / self.sample_rate as f64
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// `(min, max)` dB over all cells.
    pub fn db_range(&self) -> (f32, f32) {
        self.power_db
            .iter()
            .flatten()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}
