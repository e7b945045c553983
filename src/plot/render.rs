use crate::audio::amdf::{F0Contour, F0Range};
use crate::error::{PitchError, PitchResult};
use crate::plot::spectrogram::{SPECTROGRAM_MAX_HZ, Spectrogram};
use clap::ValueEnum;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

const WAVEFORM_SIZE: (u32, u32) = (1600, 400);
const PANEL_SIZE: (u32, u32) = (1200, 400);
const SPECTROGRAM_SIZE: (u32, u32) = (1200, 800);
const FULL_FIGURE_SIZE: (u32, u32) = (1200, 900);
const FM_TITLE: &str = "AMDF Frequency Modulation (FM) envelope (F0 estimation, pitch tracking)";
#[cfg(feature = "font-labels")]
const FONT: (&str, u32) = ("sans-serif", 18);
#[cfg(not(feature = "font-labels"))]
const GRID_DIVISIONS: usize = 10;

/// One combined figure or one PNG per panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FigureLayout {
    Single,
    Multiple,
}

/// Everything the figures are drawn from. Nothing here is mutated.
pub struct PlotInputs<'a> {
    pub label: &'a str,
    pub sample_rate: u32,
    /// Median-smoothed, normalized signal.
    pub smoothed: &'a [f32],
    pub envelope: &'a [f32],
    /// `envelope` thinned to one value per analysis frame.
    pub thin_envelope: &'a [f32],
    pub contour: &'a F0Contour,
    pub range: F0Range,
    pub spectrogram: &'a Spectrogram,
    /// Overlay the AM envelope on the FM panel.
    pub show_envelope: bool,
}

impl PlotInputs<'_> {
    fn duration(&self) -> f64 {
        (self.smoothed.len() as f64 / self.sample_rate as f64).max(f64::EPSILON)
    }

    fn sample_times(&self, values: &'_ [f32]) -> Vec<(f64, f64)> {
        let sr = self.sample_rate as f64;
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64 / sr, v as f64))
            .collect()
    }
}

fn plot_error<E: std::fmt::Display>(error: E) -> PitchError {
    PitchError::output(format!("failed to render plot: {error}"))
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Chart over `x` by `y`. The caption is only drawn when font support is
/// compiled in; without it plotters panics on any text.
fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    x: Range<f64>,
    y: Range<f64>,
) -> PitchResult<Chart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    #[cfg(feature = "font-labels")]
    builder
        .caption(title, FONT)
        .x_label_area_size(40)
        .y_label_area_size(50);
    #[cfg(not(feature = "font-labels"))]
    let _ = title;
    builder.build_cartesian_2d(x, y).map_err(plot_error)
}

/// Labelled mesh with font support, a plain grid without.
fn draw_axes<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x: Range<f64>,
    y: Range<f64>,
    x_desc: &str,
    y_desc: Option<&str>,
) -> PitchResult<()> {
    #[cfg(feature = "font-labels")]
    {
        let _ = (x, y);
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(x_desc);
        if let Some(y_desc) = y_desc {
            mesh.y_desc(y_desc);
        }
        mesh.draw().map_err(plot_error)?;
    }
    #[cfg(not(feature = "font-labels"))]
    {
        let _ = (x_desc, y_desc);
        let grid = RGBColor(220, 220, 220);
        for i in 0..=GRID_DIVISIONS {
            let frac = i as f64 / GRID_DIVISIONS as f64;
            let gx = x.start + (x.end - x.start) * frac;
            let gy = y.start + (y.end - y.start) * frac;
            chart
                .draw_series(LineSeries::new(vec![(gx, y.start), (gx, y.end)], &grid))
                .map_err(plot_error)?;
            chart
                .draw_series(LineSeries::new(vec![(x.start, gy), (x.end, gy)], &grid))
                .map_err(plot_error)?;
        }
    }
    Ok(())
}

fn draw_waveform<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    inputs: &PlotInputs<'_>,
) -> PitchResult<()> {
    let (x, y) = (0.0..inputs.duration(), -1.0..1.0);
    let mut chart = build_chart(area, "Waveform", x.clone(), y.clone())?;
    draw_axes(&mut chart, x, y, "Time (s)", None)?;
    chart
        .draw_series(LineSeries::new(inputs.sample_times(inputs.smoothed), &GREEN))
        .map_err(plot_error)?;
    Ok(())
}

fn draw_am_envelope<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    inputs: &PlotInputs<'_>,
) -> PitchResult<()> {
    let (x, y) = (0.0..inputs.duration(), 0.0..1.1);
    let mut chart = build_chart(
        area,
        "Amplitude Modulation (AM) envelope",
        x.clone(),
        y.clone(),
    )?;
    draw_axes(&mut chart, x, y, "Time (s)", None)?;
    chart
        .draw_series(LineSeries::new(
            inputs.sample_times(inputs.envelope),
            RED.stroke_width(2),
        ))
        .map_err(plot_error)?;
    Ok(())
}

/// Voiced frames of the contour as scatter points.
fn draw_f0_track<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    inputs: &PlotInputs<'_>,
) -> PitchResult<()> {
    let (min, max) = (inputs.range.min() as f64, inputs.range.max() as f64);
    let (x, y) = (0.0..inputs.duration(), min..max);
    let mut chart = build_chart(area, FM_TITLE, x.clone(), y.clone())?;
    draw_axes(&mut chart, x, y, "Time (s)", Some("F0 (Hz)"))?;
    chart
        .draw_series(
            inputs
                .contour
                .points()
                .filter(|&(_, f0)| (f0 as f64) >= min && (f0 as f64) <= max)
                .map(|(t, f0)| Circle::new((t, f0 as f64), 2, BLUE.filled())),
        )
        .map_err(plot_error)?;
    Ok(())
}

/// F0 track with the AM envelope overlaid, both scaled to `0..=1`.
fn draw_fm_and_am<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    inputs: &PlotInputs<'_>,
) -> PitchResult<()> {
    if !inputs.show_envelope {
        return draw_f0_track(area, inputs);
    }

    let title = "AM envelope & AMDF Frequency Modulation (FM) envelope";
    let (x, y) = (0.0..inputs.duration(), 0.0..1.1);
    let mut chart = build_chart(area, title, x.clone(), y.clone())?;
    draw_axes(&mut chart, x, y, "Time (s)", None)?;

    let frame_duration = inputs.contour.frame_duration();
    chart
        .draw_series(LineSeries::new(
            inputs
                .thin_envelope
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64 * frame_duration, v as f64)),
            RED.stroke_width(2),
        ))
        .map_err(plot_error)?;

    let f0_peak = inputs.contour.f0().iter().copied().fold(0.0_f32, f32::max);
    if f0_peak > 0.0 {
        chart
            .draw_series(
                inputs
                    .contour
                    .points()
                    .map(|(t, f0)| Circle::new((t, 0.5 * (f0 / f0_peak) as f64), 2, BLUE.filled())),
            )
            .map_err(plot_error)?;
    }
    Ok(())
}

/// dB value to a dark-blue → yellow colour.
fn heat_colour(t: f64) -> HSLColor {
    let t = t.clamp(0.0, 1.0);
    HSLColor(0.7 - 0.55 * t, 0.9, 0.1 + 0.5 * t)
}

fn draw_spectrogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    inputs: &PlotInputs<'_>,
) -> PitchResult<()> {
    let spectrogram = inputs.spectrogram;
    let max_hz = SPECTROGRAM_MAX_HZ.min(inputs.sample_rate as f32 / 2.0) as f64;
    let duration = inputs.duration();
    let (x, y) = (0.0..duration, 0.0..max_hz);
    let mut chart = build_chart(area, "Spectrogram", x.clone(), y.clone())?;

    let (lo, hi) = spectrogram.db_range();
    let span = (hi - lo).max(f32::EPSILON) as f64;
    let hop_seconds = spectrogram.hop() as f64 / inputs.sample_rate as f64;
    let bin_hz = spectrogram.bin_frequency(1) as f64;

    let cells = spectrogram
        .power_db()
        .iter()
        .enumerate()
        .flat_map(|(frame, bins)| {
            let t0 = spectrogram.frame_start_time(frame);
            let t1 = (t0 + hop_seconds).min(duration);
            bins.iter()
                .enumerate()
                .map(move |(bin, &db)| (t0, t1, bin as f64 * bin_hz, db))
        })
        .filter(move |&(t0, _, f, _)| t0 < duration && f < max_hz)
        .map(move |(t0, t1, f, db)| {
            let colour = heat_colour((db - lo) as f64 / span);
            Rectangle::new([(t0, f), (t1, (f + bin_hz).min(max_hz))], colour.filled())
        });
    chart.draw_series(cells).map_err(plot_error)?;
    draw_axes(&mut chart, x, y, "Time (s)", Some("Frequency (Hz)"))?;
    Ok(())
}

/// Writes the diagnostic figures as PNG files.
pub struct PlotRenderer {
    output_dir: PathBuf,
    layout: FigureLayout,
}

impl PlotRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P, layout: FigureLayout) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            layout,
        }
    }

    /// Figure paths for `label`, in drawing order.
    pub fn figure_paths(&self, label: &str) -> Vec<PathBuf> {
        let names: Vec<String> = match self.layout {
            FigureLayout::Single => vec![format!("speech-full-{label}.png")],
            FigureLayout::Multiple => vec![
                format!("speech-waveform-{label}.png"),
                format!("speech-amenvelope-{label}.png"),
                format!("speech-f0track-{label}.png"),
                format!("speech-FMandAMenvelopes-{label}.png"),
                format!("speech-spectrogram-{label}.png"),
            ],
        };
        names.into_iter().map(|n| self.output_dir.join(n)).collect()
    }

    pub fn render(&self, inputs: &PlotInputs<'_>) -> PitchResult<Vec<PathBuf>> {
        let paths = self.figure_paths(inputs.label);
        match self.layout {
            FigureLayout::Single => self.render_single(&paths[0], inputs)?,
            FigureLayout::Multiple => self.render_multiple(&paths, inputs)?,
        }
        debug!(figures = paths.len(), "Rendered figures");
        Ok(paths)
    }

    fn render_single(&self, path: &Path, inputs: &PlotInputs<'_>) -> PitchResult<()> {
        let root = BitMapBackend::new(path, FULL_FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        #[cfg(feature = "font-labels")]
        let root = root
            .titled("DIY: F0 estimation (aka \"pitch extraction\")", ("sans-serif", 24))
            .map_err(plot_error)?;
        let panels = root.split_evenly((5, 1));
        draw_waveform(&panels[0], inputs)?;
        draw_am_envelope(&panels[1], inputs)?;
        draw_f0_track(&panels[2], inputs)?;
        draw_fm_and_am(&panels[3], inputs)?;
        draw_spectrogram(&panels[4], inputs)?;
        root.present().map_err(plot_error)?;
        Ok(())
    }

    fn render_multiple(&self, paths: &[PathBuf], inputs: &PlotInputs<'_>) -> PitchResult<()> {
        {
            let root = BitMapBackend::new(&paths[0], WAVEFORM_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            draw_waveform(&root, inputs)?;
            root.present().map_err(plot_error)?;
        }
        {
            let root = BitMapBackend::new(&paths[1], PANEL_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            draw_am_envelope(&root, inputs)?;
            root.present().map_err(plot_error)?;
        }
        {
            let root = BitMapBackend::new(&paths[2], PANEL_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            draw_f0_track(&root, inputs)?;
            root.present().map_err(plot_error)?;
        }
        {
            let root = BitMapBackend::new(&paths[3], PANEL_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            draw_fm_and_am(&root, inputs)?;
            root.present().map_err(plot_error)?;
        }
        {
            let root = BitMapBackend::new(&paths[4], SPECTROGRAM_SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;
            draw_spectrogram(&root, inputs)?;
            root.present().map_err(plot_error)?;
        }
        Ok(())
    }
}
