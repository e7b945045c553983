use crate::error::{PitchError, PitchResult};
use std::slice::ChunksExact;

/// Frames reserved at the end of the signal so the lagged comparison
/// window never reads past the last sample.
pub const LOOKAHEAD_FRAMES: usize = 2;

/// `round(sample_rate * frame_duration_seconds)`, rejecting durations that
/// give empty frames.
pub fn frame_length(sample_rate: u32, frame_duration_seconds: f64) -> PitchResult<usize> {
    if !frame_duration_seconds.is_finite() || frame_duration_seconds <= 0.0 {
        return Err(PitchError::configuration(format!(
            "frame duration must be positive, got {frame_duration_seconds}"
        )));
    }
    let length = (sample_rate as f64 * frame_duration_seconds).round() as usize;
    if length == 0 {
        return Err(PitchError::configuration(format!(
            "frame duration {frame_duration_seconds} s at {sample_rate} Hz rounds to zero samples"
        )));
    }
    Ok(length)
}

/// Smallest lag considered by the lag search.
pub fn diff_offset(frame_length: usize, window_offset_divisor: f64) -> usize {
    (frame_length as f64 / window_offset_divisor).round() as usize
}

/// Frame geometry of one signal, computed and validated up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    frame_length: usize,
    frame_count: usize,
    diff_offset: usize,
}

impl FrameLayout {
    pub fn new(
        sample_rate: u32,
        n_samples: usize,
        frame_duration_seconds: f64,
        window_offset_divisor: f64,
    ) -> PitchResult<Self> {
        if !window_offset_divisor.is_finite() || window_offset_divisor <= 0.0 {
            return Err(PitchError::configuration(format!(
                "window offset divisor must be positive, got {window_offset_divisor}"
            )));
        }
        let frame_length = frame_length(sample_rate, frame_duration_seconds)?;
        let diff_offset = diff_offset(frame_length, window_offset_divisor);
        if diff_offset >= frame_length {
            return Err(PitchError::configuration(format!(
                "window offset divisor {window_offset_divisor} leaves no lags to search \
                 in a {frame_length}-sample frame"
            )));
        }
        Ok(Self {
            frame_length,
            frame_count: n_samples / frame_length,
            diff_offset,
        })
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Number of complete frames; trailing samples are dropped.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn diff_offset(&self) -> usize {
        self.diff_offset
    }

    pub fn truncated_len(&self) -> usize {
        self.frame_count * self.frame_length
    }

    /// Frames that have enough lookahead for a full lag search.
    pub fn analysable_frames(&self) -> usize {
        self.frame_count.saturating_sub(LOOKAHEAD_FRAMES)
    }
}

/// A non-overlapping analysis frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    index: usize,
    start: usize,
    samples: &'a [f32],
}

impl<'a> Frame<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset of the first sample within the signal.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }
}

/// Lazy iterator over the frames of a signal. Cloning restarts it.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    chunks: ChunksExact<'a, f32>,
    frame_length: usize,
    next_index: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let samples = self.chunks.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(Frame {
            index,
            start: index * self.frame_length,
            samples,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Split `samples` into `floor(len / frame_length)` frames.
pub fn segment(samples: &[f32], frame_length: usize) -> PitchResult<Frames<'_>> {
    if frame_length == 0 {
        return Err(PitchError::configuration("frame length must be > 0"));
    }
    let frame_count = samples.len() / frame_length;
    let truncated = &samples[..frame_count * frame_length];
    Ok(Frames {
        chunks: truncated.chunks_exact(frame_length),
        frame_length,
        next_index: 0,
    })
}
