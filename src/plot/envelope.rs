use crate::audio::amdf::postprocess::median_filter;
use crate::error::PitchResult;

pub const SIGNAL_MEDIAN_WINDOW: usize = 31;
pub const PEAK_WINDOW: usize = 20;
pub const ENVELOPE_MEDIAN_WINDOW: usize = 201;

/// Scale so the largest magnitude is 1. All-zero input is returned as is.
pub fn normalize_peak(values: &[f32]) -> Vec<f32> {
    let peak = values.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()));
    if peak == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / peak).collect()
}

/// Median-smoothed, peak-normalized copy of the signal for display.
pub fn smooth_signal(samples: &[f32], window: usize) -> PitchResult<Vec<f32>> {
    let smoothed = median_filter(samples, window)?;
    Ok(normalize_peak(&smoothed))
}

/// Amplitude envelope: running peak of `|x|` over the preceding
/// `peak_window` samples, median-smoothed and normalized to 1. The last
/// `peak_window` positions are zero so the output matches the input length.
pub fn am_envelope(
    normalized: &[f32],
    peak_window: usize,
    smoothing_window: usize,
) -> PitchResult<Vec<f32>> {
    let n = normalized.len();
    if peak_window == 0 || n <= peak_window {
        return Ok(vec![0.0; n]);
    }

    let magnitude: Vec<f32> = normalized.iter().map(|v| v.abs()).collect();
    let peaks: Vec<f32> = magnitude
        .windows(peak_window)
        .take(n - peak_window)
        .map(|w| w.iter().copied().fold(0.0_f32, f32::max))
        .collect();

    let mut envelope = median_filter(&peaks, smoothing_window)?;
    envelope.resize(n, 0.0);
    Ok(normalize_peak(&envelope))
}

/// Every `step`-th value, used to line the envelope up with the F0 frames.
pub fn thin(values: &[f32], step: usize) -> Vec<f32> {
    values.iter().step_by(step.max(1)).copied().collect()
}
