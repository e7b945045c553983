use crate::audio::Signal;
use crate::audio::voice::VoiceCategory;
use crate::error::{PitchError, PitchResult};
use tracing::{debug, info};

pub mod clip;
pub mod frames;
pub mod lag;
pub mod postprocess;

use frames::FrameLayout;

// Analysis defaults
pub const DEFAULT_FRAME_DURATION: f64 = 0.01;
pub const DEFAULT_CENTRE_CLIP: f32 = 10.0;
pub const DEFAULT_WINDOW_OFFSET_DIVISOR: f64 = 20.0;
pub const DEFAULT_MEDIAN_WINDOW: usize = 3;

/// Marker written for unvoiced, out-of-range or failed frames.
pub const UNVOICED: f32 = 0.0;

/// Valid F0 range in Hz. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F0Range {
    min: f32,
    max: f32,
}

impl F0Range {
    pub fn new(min: f32, max: f32) -> PitchResult<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
            return Err(PitchError::configuration(format!(
                "invalid F0 range {min}..{max} Hz"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn contains(&self, f0: f32) -> bool {
        f0 > self.min && f0 < self.max
    }
}

impl From<VoiceCategory> for F0Range {
    fn from(voice: VoiceCategory) -> Self {
        let (min, max) = voice.f0_bounds();
        F0Range { min, max }
    }
}

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AmdfConfig {
    pub frame_duration_seconds: f64,
    /// Amplitude floor; samples with `|x| <= threshold` are zeroed.
    pub centre_clip_threshold: f32,
    /// `diff_offset = round(frame_length / window_offset_divisor)`.
    pub window_offset_divisor: f64,
    pub median_window: usize,
    pub range: F0Range,
}

impl AmdfConfig {
    pub fn new(range: F0Range) -> Self {
        Self {
            frame_duration_seconds: DEFAULT_FRAME_DURATION,
            centre_clip_threshold: DEFAULT_CENTRE_CLIP,
            window_offset_divisor: DEFAULT_WINDOW_OFFSET_DIVISOR,
            median_window: DEFAULT_MEDIAN_WINDOW,
            range,
        }
    }

    pub fn for_voice(voice: VoiceCategory) -> Self {
        Self {
            frame_duration_seconds: voice.frame_duration(),
            ..Self::new(voice.into())
        }
    }

    /// Checks everything that can be checked without a signal.
    pub fn validate(&self) -> PitchResult<()> {
        if !self.frame_duration_seconds.is_finite() || self.frame_duration_seconds <= 0.0 {
            return Err(PitchError::configuration(format!(
                "frame duration must be positive, got {}",
                self.frame_duration_seconds
            )));
        }
        if !self.centre_clip_threshold.is_finite() || self.centre_clip_threshold < 0.0 {
            return Err(PitchError::configuration(format!(
                "centre clip threshold must be non-negative, got {}",
                self.centre_clip_threshold
            )));
        }
        if !self.window_offset_divisor.is_finite() || self.window_offset_divisor <= 0.0 {
            return Err(PitchError::configuration(format!(
                "window offset divisor must be positive, got {}",
                self.window_offset_divisor
            )));
        }
        postprocess::check_median_window(self.median_window)?;
        // Re-validate in case the fields were set directly
        F0Range::new(self.range.min(), self.range.max())?;
        Ok(())
    }

    /// Frame layout for a signal of `n_samples` at `sample_rate`.
    pub fn layout(&self, sample_rate: u32, n_samples: usize) -> PitchResult<FrameLayout> {
        FrameLayout::new(
            sample_rate,
            n_samples,
            self.frame_duration_seconds,
            self.window_offset_divisor,
        )
    }
}

/// Final F0 track: one value per analysed frame, `UNVOICED` where no
/// plausible estimate exists.
#[derive(Debug, Clone, PartialEq)]
pub struct F0Contour {
    f0: Vec<f32>,
    frame_duration: f64,
}

impl F0Contour {
    pub fn new(f0: Vec<f32>, frame_duration: f64) -> Self {
        Self { f0, frame_duration }
    }

    pub fn f0(&self) -> &[f32] {
        &self.f0
    }

    pub fn frame_duration(&self) -> f64 {
        self.frame_duration
    }

    pub fn len(&self) -> usize {
        self.f0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f0.is_empty()
    }

    /// Time offset of frame `index`, rounded to the nanosecond so that
    /// `3 * 0.01` reads as `0.03`.
    pub fn time_at(&self, index: usize) -> f64 {
        (index as f64 * self.frame_duration * 1e9).round() / 1e9
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.f0.len()).map(|i| self.time_at(i)).collect()
    }

    /// `(time_offset_seconds, frequency_hz)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.f0
            .iter()
            .enumerate()
            .map(|(i, &f0)| (self.time_at(i), f0))
    }

    pub fn voiced_count(&self) -> usize {
        self.f0.iter().filter(|&&f0| f0 > UNVOICED).count()
    }

    pub fn mean_voiced(&self) -> Option<f32> {
        let voiced = self.voiced_count();
        if voiced == 0 {
            return None;
        }
        let sum: f32 = self.f0.iter().filter(|&&f0| f0 > UNVOICED).sum();
        Some(sum / voiced as f32)
    }
}

/// Full pipeline: centre-clip, segment, AMDF lag search, range gate and
/// median smoothing.
pub fn estimate_contour(signal: &Signal, config: &AmdfConfig) -> PitchResult<F0Contour> {
    config.validate()?;
    let layout = config.layout(signal.sample_rate(), signal.len())?;
    info!(
        frame_length = layout.frame_length(),
        frame_count = layout.frame_count(),
        diff_offset = layout.diff_offset(),
        analysable_frames = layout.analysable_frames(),
        "Frame layout"
    );
    debug!(
        centre_clip = config.centre_clip_threshold,
        f0_min = config.range.min(),
        f0_max = config.range.max(),
        median_window = config.median_window,
        "AMDF parameters"
    );

    let truncated = &signal.samples()[..layout.truncated_len()];
    let clipped = clip::centre_clip(truncated, config.centre_clip_threshold);
    let raw = lag::estimate_raw_f0(&clipped, signal.sample_rate(), &layout)?;
    let f0 = postprocess::postprocess(&raw, config.range, config.median_window)?;

    let contour = F0Contour::new(f0, config.frame_duration_seconds);
    debug!(
        frames = contour.len(),
        voiced = contour.voiced_count(),
        "Completed F0 estimation"
    );
    Ok(contour)
}
