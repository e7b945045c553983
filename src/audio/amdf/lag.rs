use crate::audio::amdf::UNVOICED;
use crate::audio::amdf::frames::{self, Frame, FrameLayout};
use crate::error::{EstimationFailure, PitchResult};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Average Magnitude Difference Function of the frame starting at `start`.
///
/// `curve[lag]` is the mean of `|x[start + i] - x[start + lag + i]|` over
/// `i in 0..frame_length`, for every lag in `0..frame_length`. The lagged
/// window reaches `2 * frame_length - 1` samples past `start`.
pub fn amdf_curve(
    signal: &[f32],
    start: usize,
    frame_length: usize,
) -> Result<Vec<f64>, EstimationFailure> {
    let needed = (start + 2 * frame_length).saturating_sub(1);
    if signal.len() < needed {
        return Err(EstimationFailure::InsufficientLookahead {
            start,
            needed,
            available: signal.len(),
        });
    }

    let frame = &signal[start..start + frame_length];
    let curve = (0..frame_length)
        .map(|lag| {
            let window = &signal[start + lag..start + lag + frame_length];
            let sum: f64 = frame
                .iter()
                .zip(window)
                .map(|(&a, &b)| (a as f64 - b as f64).abs())
                .sum();
            sum / frame_length as f64
        })
        .collect();
    Ok(curve)
}

/// Lag with the smallest AMDF value at or above `diff_offset`.
/// Ties go to the lowest lag.
pub fn select_lag(curve: &[f64], diff_offset: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (lag, &value) in curve.iter().enumerate().skip(diff_offset) {
        match best {
            Some((_, min)) if value >= min => {}
            _ => best = Some((lag, value)),
        }
    }
    best.map(|(lag, _)| lag)
}

/// `sample_rate / lag`; lag 0 has no physical frequency.
pub fn lag_to_frequency(sample_rate: u32, lag: usize) -> Result<f32, EstimationFailure> {
    if lag == 0 {
        return Err(EstimationFailure::DegenerateLag);
    }
    Ok(sample_rate as f32 / lag as f32)
}

/// F0 estimate of a single frame.
pub fn estimate_frame(
    signal: &[f32],
    start: usize,
    frame_length: usize,
    diff_offset: usize,
    sample_rate: u32,
) -> Result<f32, EstimationFailure> {
    let curve = amdf_curve(signal, start, frame_length)?;
    let lag = select_lag(&curve, diff_offset)
        .ok_or(EstimationFailure::NoCandidateLags { diff_offset })?;
    lag_to_frequency(sample_rate, lag)
}

/// Raw F0 sequence: one value per analysable frame, in frame order.
/// Failed frames are recorded as `UNVOICED`.
///
/// Cost is `O(frames * frame_length^2)`; frames are independent and are
/// evaluated in parallel.
pub fn estimate_raw_f0(
    clipped: &[f32],
    sample_rate: u32,
    layout: &FrameLayout,
) -> PitchResult<Vec<f32>> {
    let frames: Vec<Frame<'_>> = frames::segment(clipped, layout.frame_length())?
        .take(layout.analysable_frames())
        .collect();

    let estimates: Vec<Result<f32, EstimationFailure>> = frames
        .par_iter()
        .map(|frame| {
            estimate_frame(
                clipped,
                frame.start(),
                layout.frame_length(),
                layout.diff_offset(),
                sample_rate,
            )
        })
        .collect();

    let mut failed = 0usize;
    let raw: Vec<f32> = frames
        .iter()
        .zip(estimates)
        .map(|(frame, estimate)| match estimate {
            Ok(f0) => f0,
            Err(failure) => {
                failed += 1;
                trace!(frame = frame.index(), %failure, "Frame estimation failed");
                UNVOICED
            }
        })
        .collect();

    debug!(frames = raw.len(), failed, "Computed raw F0 sequence");
    Ok(raw)
}
