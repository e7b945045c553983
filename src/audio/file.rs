use crate::audio::Signal;
use crate::error::{PitchError, PitchResult};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// Decoded WAV contents. Integer formats keep their native amplitude;
/// float formats are scaled by `i16::MAX` so amplitude thresholds read the
/// same for both.
#[derive(Debug, Clone)]
pub struct WavData {
    samples: Vec<f32>,
    spec: WavSpec,
}

impl WavData {
    /// Load a mono WAV file.
    pub fn load<P: AsRef<Path>>(path: P) -> PitchResult<Self> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path)
            .map_err(|e| PitchError::input(format!("failed to open {:?}: {e}", path)))?;
        let spec = reader.spec();

        if spec.channels != 1 {
            return Err(PitchError::input(format!(
                "expected a mono file, {:?} has {} channels",
                path, spec.channels
            )));
        }

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Int => reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32))
                .collect::<Result<_, _>>()?,
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|sample| sample.map(|v| v * i16::MAX as f32))
                .collect::<Result<_, _>>()?,
        };

        debug!(
            sample_rate = spec.sample_rate,
            bits_per_sample = spec.bits_per_sample,
            n_samples = samples.len(),
            "Loaded WAV file"
        );

        Ok(WavData { samples, spec })
    }

    pub fn from_signal(signal: &Signal) -> Self {
        WavData {
            samples: signal.samples().to_vec(),
            spec: WavSpec {
                channels: 1,
                sample_rate: signal.sample_rate(),
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
        }
    }

    /// Save as 16-bit PCM mono.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PitchResult<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.spec.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let path = path.as_ref();
        let write_error = |e: hound::Error| PitchError::output(format!("failed to write {:?}: {e}", path));

        let mut writer = WavWriter::create(path, spec).map_err(write_error)?;
        for &sample in &self.samples {
            let clamped = sample.round().clamp(i16::MIN as f32, i16::MAX as f32);
            writer.write_sample(clamped as i16).map_err(write_error)?;
        }
        writer.finalize().map_err(write_error)?;
        Ok(())
    }

    pub fn into_signal(self) -> PitchResult<Signal> {
        Signal::new(self.spec.sample_rate, self.samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.spec.bits_per_sample
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
