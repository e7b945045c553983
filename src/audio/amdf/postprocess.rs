use crate::audio::amdf::{F0Range, UNVOICED};
use crate::error::{PitchError, PitchResult};
use std::cmp::Ordering;

/// Zero every value outside the open interval `(min, max)`.
pub fn range_gate(raw: &[f32], range: F0Range) -> Vec<f32> {
    raw.iter()
        .map(|&f0| if range.contains(f0) { f0 } else { UNVOICED })
        .collect()
}

pub fn check_median_window(window: usize) -> PitchResult<()> {
    if window == 0 || window % 2 == 0 {
        return Err(PitchError::configuration(format!(
            "median window must be an odd integer >= 1, got {window}"
        )));
    }
    Ok(())
}

/// Sliding median over an odd `window`. Near the edges the window shrinks
/// symmetrically, so it stays odd and never reads outside `values`.
pub fn median_filter(values: &[f32], window: usize) -> PitchResult<Vec<f32>> {
    check_median_window(window)?;
    let half = window / 2;
    let n = values.len();
    let mut scratch = Vec::with_capacity(window);

    let filtered: Vec<f32> = (0..n)
        .map(|i| {
            let reach = half.min(i).min(n - 1 - i);
            scratch.clear();
            scratch.extend_from_slice(&values[i - reach..=i + reach]);
            let mid = scratch.len() / 2;
            let (_, median, _) = scratch.select_nth_unstable_by(mid, |a: &f32, b: &f32| {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            });
            *median
        })
        .collect();
    Ok(filtered)
}

/// Range gate followed by median smoothing. Length is preserved.
pub fn postprocess(raw: &[f32], range: F0Range, median_window: usize) -> PitchResult<Vec<f32>> {
    check_median_window(median_window)?;
    let gated = range_gate(raw, range);
    median_filter(&gated, median_window)
}
