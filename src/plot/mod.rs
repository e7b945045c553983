//! Diagnostic figures: waveform, AM envelope, F0 track, FM/AM overlay and
//! spectrogram, rendered to PNG with `plotters`.

pub mod envelope;
pub mod render;
pub mod spectrogram;

use crate::audio::Signal;
use crate::audio::amdf::{AmdfConfig, F0Contour};
use crate::error::PitchResult;
use std::path::{Path, PathBuf};
use tracing::info;

pub use render::{FigureLayout, PlotInputs, PlotRenderer};
pub use spectrogram::Spectrogram;

/// Derives the display signals from `signal` and renders every figure into
/// `output_dir`. Returns the written paths.
pub fn render_diagnostics<P: AsRef<Path>>(
    signal: &Signal,
    contour: &F0Contour,
    config: &AmdfConfig,
    label: &str,
    output_dir: P,
    layout: FigureLayout,
    show_envelope: bool,
) -> PitchResult<Vec<PathBuf>> {
    let smoothed = envelope::smooth_signal(signal.samples(), envelope::SIGNAL_MEDIAN_WINDOW)?;
    let am = envelope::am_envelope(
        &smoothed,
        envelope::PEAK_WINDOW,
        envelope::ENVELOPE_MEDIAN_WINDOW,
    )?;
    let layout_info = config.layout(signal.sample_rate(), signal.len())?;
    let thin_am = envelope::thin(&am, layout_info.frame_length());
    let spectrogram = Spectrogram::compute(
        &smoothed,
        signal.sample_rate(),
        Spectrogram::default_window(signal.sample_rate()).max(2),
    )?;

    let inputs = PlotInputs {
        label,
        sample_rate: signal.sample_rate(),
        smoothed: &smoothed,
        envelope: &am,
        thin_envelope: &thin_am,
        contour,
        range: config.range,
        spectrogram: &spectrogram,
        show_envelope,
    };
    let paths = PlotRenderer::new(output_dir, layout).render(&inputs)?;
    for path in &paths {
        info!(path = ?path, "Wrote figure");
    }
    Ok(paths)
}
