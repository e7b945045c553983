/// Centre-clipping: zero every sample whose magnitude is at or below
/// `threshold`, pass the rest through unchanged.
pub fn centre_clip(samples: &[f32], threshold: f32) -> Vec<f32> {
    samples
        .iter()
        .map(|&x| if x.abs() <= threshold { 0.0 } else { x })
        .collect()
}
