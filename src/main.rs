use amdf_pitch::audio::amdf::{
    AmdfConfig, DEFAULT_CENTRE_CLIP, DEFAULT_MEDIAN_WINDOW, DEFAULT_WINDOW_OFFSET_DIVISOR,
};
use amdf_pitch::audio::voice::VoiceCategory;
use amdf_pitch::pipeline::Analysis;
use amdf_pitch::plot::FigureLayout;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Estimate the F0 contour of a mono speech recording with the AMDF method.
#[derive(Parser, Debug)]
#[command(name = "amdf_pitch", version, about)]
struct Cli {
    /// Mono WAV file to analyse
    wav: PathBuf,

    /// Voice category, selects the valid F0 range
    #[arg(value_enum)]
    voice: VoiceCategory,

    /// One combined figure or one file per panel
    #[arg(long, value_enum, default_value_t = FigureLayout::Multiple)]
    figure: FigureLayout,

    /// Directory for the CSV table and figures
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Frame duration in seconds [default: 0.01, or 0.02 for low voices]
    #[arg(long)]
    frame_duration: Option<f64>,

    /// Samples with |x| <= this are zeroed before analysis
    #[arg(long, default_value_t = DEFAULT_CENTRE_CLIP)]
    centre_clip: f32,

    /// Smallest searched lag is frame_length / divisor
    #[arg(long, default_value_t = DEFAULT_WINDOW_OFFSET_DIVISOR)]
    window_offset_divisor: f64,

    /// Odd median filter width applied to the F0 track
    #[arg(long, default_value_t = DEFAULT_MEDIAN_WINDOW)]
    median_window: usize,

    /// Overlay the AM envelope on the FM envelope figure
    #[arg(long)]
    envelope: bool,

    /// Only write the CSV table
    #[arg(long)]
    no_plots: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> AmdfConfig {
        let mut config = AmdfConfig::for_voice(self.voice);
        if let Some(duration) = self.frame_duration {
            config.frame_duration_seconds = duration;
        }
        config.centre_clip_threshold = self.centre_clip;
        config.window_offset_divisor = self.window_offset_divisor;
        config.median_window = self.median_window;
        config
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "Parsed arguments");

    let analysis = Analysis {
        config: cli.config(),
        wav: cli.wav,
        output_dir: cli.output_dir,
        figures: (!cli.no_plots).then_some(cli.figure),
        show_envelope: cli.envelope,
    };
    let report = analysis
        .run()
        .with_context(|| format!("analysis of {:?} failed", analysis.wav))?;

    println!(
        "Sampling rate: {} Hz, n_samples: {}",
        report.sample_rate, report.n_samples
    );
    println!("F0 contour written to {}", report.csv_path.display());
    if !report.figures.is_empty() {
        println!("Figures:");
        for figure in &report.figures {
            println!("\t{}", figure.display());
        }
    }
    Ok(())
}
