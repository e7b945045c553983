//! Rendering tests for the diagnostic figures. Each test writes PNGs into
//! its own directory under `tests/out`.

use std::fs;
use std::path::{Path, PathBuf};

use amdf_pitch::plot::{self, FigureLayout};
use amdf_pitch::{AmdfConfig, Signal, VoiceCategory};

fn output_dir(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("out");
    p.push(name);
    fs::create_dir_all(&p).expect("failed to create output directory");
    p
}

fn vowel_like(sr: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = n as f64 / sr as f64;
            let fade = (t * 4.0).min(1.0);
            let v = (2.0 * std::f64::consts::PI * 220.0 * t).sin() * 8000.0
                + (2.0 * std::f64::consts::PI * 660.0 * t).sin() * 2000.0;
            (v * fade).round() as f32
        })
        .collect()
}

fn assert_written(dir: &Path, names: &[&str]) {
    for name in names {
        let path = dir.join(name);
        let meta = fs::metadata(&path).unwrap_or_else(|e| panic!("{:?} missing: {e}", path));
        assert!(meta.len() > 0, "{:?} is empty", path);
    }
}

fn render(
    signal: &Signal,
    voice: VoiceCategory,
    dir: &Path,
    layout: FigureLayout,
    show_envelope: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let config = AmdfConfig::for_voice(voice);
    let contour = signal.estimate_f0(&config)?;
    Ok(plot::render_diagnostics(
        signal,
        &contour,
        &config,
        "vowel",
        dir,
        layout,
        show_envelope,
    )?)
}

#[test]
fn multiple_layout_writes_one_png_per_panel() -> anyhow::Result<()> {
    let signal = Signal::new(16000, vowel_like(16000, 8000))?;
    let dir = output_dir("render_multiple");
    let paths = render(&signal, VoiceCategory::FairlyHigh, &dir, FigureLayout::Multiple, false)?;

    let names = [
        "speech-waveform-vowel.png",
        "speech-amenvelope-vowel.png",
        "speech-f0track-vowel.png",
        "speech-FMandAMenvelopes-vowel.png",
        "speech-spectrogram-vowel.png",
    ];
    let expected: Vec<PathBuf> = names.iter().map(|n| dir.join(n)).collect();
    assert_eq!(paths, expected);
    assert_written(&dir, &names);
    Ok(())
}

#[test]
fn single_layout_with_envelope_overlay_writes_one_png() -> anyhow::Result<()> {
    let signal = Signal::new(8000, vowel_like(8000, 4000))?;
    let dir = output_dir("render_single");
    let paths = render(&signal, VoiceCategory::Mid, &dir, FigureLayout::Single, true)?;

    assert_eq!(paths, vec![dir.join("speech-full-vowel.png")]);
    assert_written(&dir, &["speech-full-vowel.png"]);
    Ok(())
}

#[test]
fn envelope_overlay_changes_only_the_fm_panel() -> anyhow::Result<()> {
    let signal = Signal::new(8000, vowel_like(8000, 4000))?;
    let plain_dir = output_dir("render_no_envelope");
    let overlay_dir = output_dir("render_with_envelope");
    render(&signal, VoiceCategory::Mid, &plain_dir, FigureLayout::Multiple, false)?;
    render(&signal, VoiceCategory::Mid, &overlay_dir, FigureLayout::Multiple, true)?;

    let read = |dir: &Path, name: &str| fs::read(dir.join(name));
    let fm = "speech-FMandAMenvelopes-vowel.png";
    assert_ne!(read(&plain_dir, fm)?, read(&overlay_dir, fm)?);

    let waveform = "speech-waveform-vowel.png";
    assert_eq!(read(&plain_dir, waveform)?, read(&overlay_dir, waveform)?);
    Ok(())
}
