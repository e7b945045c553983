//! End-to-end tests for the AMDF pipeline:
//! 1. Write a synthetic recording to disk.
//! 2. Load it and estimate the F0 contour.
//! 3. Export the contour as CSV and read it back.

use std::fs;
use std::path::PathBuf;

use amdf_pitch::audio::amdf::UNVOICED;
use amdf_pitch::audio::file::WavData;
use amdf_pitch::export;
use amdf_pitch::{AmdfConfig, F0Range, PitchError, Signal, VoiceCategory};

fn output_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("out");
    fs::create_dir_all(&p).expect("failed to create tests/out directory");
    p.push(name);
    p
}

fn sine_wave(freq: f64, sr: u32, len: usize, amplitude: f64) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let phase = 2.0 * std::f64::consts::PI * freq * n as f64 / sr as f64;
            (amplitude * phase.sin()).round() as f32
        })
        .collect()
}

fn config_100_400() -> AmdfConfig {
    AmdfConfig::new(F0Range::new(100.0, 400.0).unwrap())
}

#[test]
fn sine_at_200_hz_is_tracked_within_20_hz() -> anyhow::Result<()> {
    let path = output_path("pipeline_sine_200.wav");
    let signal = Signal::new(16000, sine_wave(200.0, 16000, 16000, 12000.0))?;
    WavData::from_signal(&signal).save(&path)?;

    let loaded = WavData::load(&path)?.into_signal()?;
    let contour = loaded.estimate_f0(&config_100_400())?;

    assert_eq!(contour.len(), 16000 / 160 - 2);
    assert!(
        contour.voiced_count() * 10 >= contour.len() * 9,
        "only {} of {} frames voiced",
        contour.voiced_count(),
        contour.len()
    );
    for (i, &f0) in contour.f0().iter().enumerate() {
        if f0 != UNVOICED {
            assert!(
                (f0 - 200.0).abs() <= 20.0,
                "frame {i}: estimate {f0} Hz too far from 200 Hz"
            );
        }
    }
    Ok(())
}

#[test]
fn contour_length_follows_frame_count() -> anyhow::Result<()> {
    let config = config_100_400();
    for len in [320, 480, 1000, 4801, 16037] {
        let signal = Signal::new(16000, sine_wave(150.0, 16000, len, 5000.0))?;
        let contour = signal.estimate_f0(&config)?;
        assert_eq!(contour.len(), (len / 160).saturating_sub(2), "len {len}");
    }
    Ok(())
}

#[test]
fn rerunning_gives_identical_contours() -> anyhow::Result<()> {
    let samples: Vec<f32> = sine_wave(180.0, 16000, 8000, 9000.0)
        .into_iter()
        .zip(sine_wave(540.0, 16000, 8000, 2000.0))
        .map(|(a, b)| a + b)
        .collect();
    let signal = Signal::new(16000, samples)?;
    let config = AmdfConfig::for_voice(VoiceCategory::Mid);
    assert_eq!(signal.estimate_f0(&config)?, signal.estimate_f0(&config)?);
    Ok(())
}

#[test]
fn low_voice_uses_20_ms_frames() -> anyhow::Result<()> {
    let signal = Signal::new(16000, sine_wave(100.0, 16000, 16000, 10000.0))?;
    let config = AmdfConfig::for_voice(VoiceCategory::Low);
    let contour = signal.estimate_f0(&config)?;
    assert_eq!(contour.len(), 16000 / 320 - 2);
    assert_eq!(contour.frame_duration(), 0.02);
    for &f0 in contour.f0() {
        if f0 != UNVOICED {
            assert!((f0 - 100.0).abs() <= 10.0, "estimate {f0} Hz too far from 100 Hz");
        }
    }
    Ok(())
}

#[test]
fn invalid_median_window_fails_before_estimation() {
    let signal = Signal::new(16000, vec![0.0; 16000]).unwrap();
    let mut config = config_100_400();
    config.median_window = 2;
    assert!(matches!(
        signal.estimate_f0(&config),
        Err(PitchError::Configuration(_))
    ));
}

#[test]
fn csv_export_writes_time_and_frequency_rows() -> anyhow::Result<()> {
    let signal = Signal::new(16000, sine_wave(200.0, 16000, 8000, 12000.0))?;
    let contour = signal.estimate_f0(&config_100_400())?;

    let path = output_path(&export::csv_file_name("pipeline"));
    export::save_csv(&contour, "pipeline", &path)?;

    let text = fs::read_to_string(&path)?;
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 2);

    let header: Vec<&str> = rows[0].split(',').collect();
    let data: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(header[0], "speech-pipeline");
    assert_eq!(data[0], "pipeline");
    assert_eq!(header.len(), contour.len() + 1);
    assert_eq!(data.len(), contour.len() + 1);

    assert_eq!(header[1], "0.0");
    assert_eq!(header[2], "0.01");
    for (cell, &f0) in data[1..].iter().zip(contour.f0()) {
        assert_eq!(cell.parse::<f32>()?, f0);
    }
    Ok(())
}

#[test]
fn csv_export_to_missing_directory_is_an_output_error() {
    let contour = amdf_pitch::F0Contour::new(vec![200.0], 0.01);
    let path = output_path("no_such_dir").join("nested").join("x.csv");
    assert!(matches!(
        export::save_csv(&contour, "x", &path),
        Err(PitchError::Output(_))
    ));
}
