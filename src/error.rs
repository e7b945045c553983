//! Error types and result utilities for the pitch estimation pipeline.

use thiserror::Error;

/// Convenience alias for results carrying a [`PitchError`].
pub type PitchResult<T> = Result<T, PitchError>;

/// Fatal errors. Every variant aborts the run with a descriptive message.
#[derive(Error, Debug)]
pub enum PitchError {
    /// Invalid or unrecognised analysis parameter.
    ///
    /// Raised before any signal processing begins: unknown voice category,
    /// even median window, frame duration that rounds to zero samples, etc.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or unreadable signal data (empty signal, zero sample rate,
    /// stereo file, undecodable WAV).
    #[error("Input error: {0}")]
    Input(String),

    /// Failure to produce an output artifact (CSV table or figure).
    #[error("Output error: {0}")]
    Output(String),
}

impl PitchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PitchError::Configuration(message.into())
    }

    pub fn input(message: impl Into<String>) -> Self {
        PitchError::Input(message.into())
    }

    pub fn output(message: impl Into<String>) -> Self {
        PitchError::Output(message.into())
    }
}

impl From<hound::Error> for PitchError {
    fn from(error: hound::Error) -> Self {
        PitchError::Input(format!("failed to decode WAV data: {error}"))
    }
}

impl From<std::io::Error> for PitchError {
    fn from(error: std::io::Error) -> Self {
        PitchError::Output(error.to_string())
    }
}

/// Per-frame estimation failure. Contained by the lag estimator, which
/// records an unvoiced marker for the frame and carries on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationFailure {
    #[error("lag search selected lag 0")]
    DegenerateLag,

    #[error("no candidate lags at or above offset {diff_offset}")]
    NoCandidateLags { diff_offset: usize },

    #[error("frame at sample {start} needs {needed} samples of lookahead, only {available} available")]
    InsufficientLookahead {
        start: usize,
        needed: usize,
        available: usize,
    },
}
