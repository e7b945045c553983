//! Integration tests for WAV decoding.
//!
//! These tests exercise the public file API using real files written to
//! `tests/out`:
//! - Loading valid mono audio
//! - Handling invalid / missing / stereo files
//! - Round-tripping a signal through save + load

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use amdf_pitch::PitchError;
use amdf_pitch::Signal;
use amdf_pitch::audio::file::WavData;
use hound::{SampleFormat, WavSpec, WavWriter};

fn output_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("out");
    fs::create_dir_all(&p).expect("failed to create tests/out directory");
    p.push(name);
    p
}

fn write_pcm16(path: &PathBuf, channels: u16, sample_rate: u32, samples: &[i16]) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn load_valid_mono_wav_keeps_integer_amplitude() -> anyhow::Result<()> {
    let path = output_path("io_mono_pcm16.wav");
    let samples: Vec<i16> = (0..1600).map(|n| ((n % 80) as i16 - 40) * 100).collect();
    write_pcm16(&path, 1, 16000, &samples)?;

    let wav = WavData::load(&path)?;
    assert_eq!(wav.sample_rate(), 16000);
    assert_eq!(wav.bits_per_sample(), 16);
    assert_eq!(wav.n_samples(), samples.len());
    assert_eq!(wav.samples()[1], -3900.0);

    let signal = wav.into_signal()?;
    assert_eq!(signal.len(), samples.len());
    assert_eq!(signal.sample_rate(), 16000);
    Ok(())
}

#[test]
fn float_wav_is_scaled_to_pcm16_range() -> anyhow::Result<()> {
    let path = output_path("io_mono_float.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    for s in [0.5_f32, -1.0, 0.0] {
        writer.write_sample(s)?;
    }
    writer.finalize()?;

    let wav = WavData::load(&path)?;
    let expected = [0.5 * i16::MAX as f32, -(i16::MAX as f32), 0.0];
    assert_eq!(wav.samples(), &expected);
    Ok(())
}

#[test]
fn loading_nonexistent_file_returns_input_error() {
    let bogus = output_path("this_file_should_not_exist_12345.wav");
    assert!(!bogus.exists(), "bogus path unexpectedly exists: {:?}", bogus);

    let result = WavData::load(&bogus);
    assert!(
        matches!(result, Err(PitchError::Input(_))),
        "expected input error when loading nonexistent file, got: {:?}",
        result
    );
}

#[test]
fn loading_invalid_file_returns_input_error() -> anyhow::Result<()> {
    let path = output_path("not_audio.txt");
    {
        let mut f = fs::File::create(&path)?;
        writeln!(f, "this is not an audio file")?;
    }

    let result = WavData::load(&path);
    assert!(
        matches!(result, Err(PitchError::Input(_))),
        "expected input error when loading invalid audio file, got: {:?}",
        result
    );
    Ok(())
}

#[test]
fn stereo_files_are_rejected() -> anyhow::Result<()> {
    let path = output_path("io_stereo.wav");
    write_pcm16(&path, 2, 16000, &[1, 2, 3, 4, 5, 6])?;

    let result = WavData::load(&path);
    assert!(matches!(result, Err(PitchError::Input(_))));
    Ok(())
}

#[test]
fn empty_wav_cannot_become_a_signal() -> anyhow::Result<()> {
    let path = output_path("io_empty.wav");
    write_pcm16(&path, 1, 16000, &[])?;

    let wav = WavData::load(&path)?;
    assert!(matches!(wav.into_signal(), Err(PitchError::Input(_))));
    Ok(())
}

#[test]
fn round_trip_save_and_load_wav() -> anyhow::Result<()> {
    let sample_rate = 22050;
    let samples: Vec<f32> = (0..sample_rate as usize / 100)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            (12000.0 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()).round()
        })
        .collect();
    let signal = Signal::new(sample_rate, samples.clone())?;

    let out_path = output_path("io_round_trip.wav");
    if out_path.exists() {
        fs::remove_file(&out_path)?;
    }
    WavData::from_signal(&signal).save(&out_path)?;
    assert!(out_path.exists(), "expected output file at {:?}", out_path);

    let reloaded = WavData::load(&out_path)?.into_signal()?;
    assert_eq!(reloaded.sample_rate(), sample_rate);
    assert_eq!(reloaded.samples(), samples.as_slice());
    Ok(())
}
