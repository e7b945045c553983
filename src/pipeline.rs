//! End-to-end batch run: WAV in, CSV table and figures out.

use crate::audio::amdf::{AmdfConfig, F0Contour};
use crate::audio::file::WavData;
use crate::error::{PitchError, PitchResult};
use crate::export;
use crate::plot::{self, FigureLayout};
use std::path::{Path, PathBuf};
use tracing::info;

/// One analysis job.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub wav: PathBuf,
    pub config: AmdfConfig,
    pub output_dir: PathBuf,
    /// `None` writes only the CSV table.
    pub figures: Option<FigureLayout>,
    pub show_envelope: bool,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub label: String,
    pub sample_rate: u32,
    pub n_samples: usize,
    pub contour: F0Contour,
    pub csv_path: PathBuf,
    pub figures: Vec<PathBuf>,
}

/// File stem used to name every output.
pub fn file_label(path: &Path) -> PitchResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PitchError::configuration(format!("cannot derive an output name from {path:?}"))
        })
}

impl Analysis {
    pub fn run(&self) -> PitchResult<AnalysisReport> {
        self.config.validate()?;
        let label = file_label(&self.wav)?;

        let wav = WavData::load(&self.wav)?;
        info!(
            bits = wav.bits_per_sample(),
            n_samples = wav.n_samples(),
            "Loaded WAV"
        );
        let signal = wav.into_signal()?;
        info!(
            sample_rate = signal.sample_rate(),
            seconds = signal.duration_seconds(),
            "Signal ready"
        );

        let contour = signal.estimate_f0(&self.config)?;
        info!(
            frames = contour.len(),
            voiced = contour.voiced_count(),
            mean_f0 = contour.mean_voiced().unwrap_or(0.0),
            "F0 contour ready"
        );

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            PitchError::output(format!(
                "cannot create output directory {:?}: {e}",
                self.output_dir
            ))
        })?;
        let csv_path = self.output_dir.join(export::csv_file_name(&label));
        export::save_csv(&contour, &label, &csv_path)?;

        let figures = match self.figures {
            Some(layout) => plot::render_diagnostics(
                &signal,
                &contour,
                &self.config,
                &label,
                &self.output_dir,
                layout,
                self.show_envelope,
            )?,
            None => Vec::new(),
        };

        Ok(AnalysisReport {
            label,
            sample_rate: signal.sample_rate(),
            n_samples: signal.len(),
            contour,
            csv_path,
            figures,
        })
    }
}
