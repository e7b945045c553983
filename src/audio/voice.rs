use crate::audio::amdf::DEFAULT_FRAME_DURATION;
use crate::error::PitchError;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Frame duration used for the two lowest categories, whose longer periods
/// need a longer analysis frame.
pub const LOW_VOICE_FRAME_DURATION: f64 = 0.02;

/// Voice category, selecting the plausible F0 range for post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VoiceCategory {
    High,
    #[value(name = "fairlyhigh")]
    FairlyHigh,
    Mid,
    #[value(name = "fairlylow")]
    FairlyLow,
    Low,
}

impl VoiceCategory {
    pub const ALL: [VoiceCategory; 5] = [
        VoiceCategory::High,
        VoiceCategory::FairlyHigh,
        VoiceCategory::Mid,
        VoiceCategory::FairlyLow,
        VoiceCategory::Low,
    ];

    /// `(f0_min, f0_max)` in Hz.
    pub fn f0_bounds(self) -> (f32, f32) {
        match self {
            VoiceCategory::High => (160.0, 450.0),
            VoiceCategory::FairlyHigh => (140.0, 400.0),
            VoiceCategory::Mid => (120.0, 350.0),
            VoiceCategory::FairlyLow => (100.0, 300.0),
            VoiceCategory::Low => (50.0, 250.0),
        }
    }

    pub fn frame_duration(self) -> f64 {
        match self {
            VoiceCategory::FairlyLow | VoiceCategory::Low => LOW_VOICE_FRAME_DURATION,
            _ => DEFAULT_FRAME_DURATION,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VoiceCategory::High => "high",
            VoiceCategory::FairlyHigh => "fairlyhigh",
            VoiceCategory::Mid => "mid",
            VoiceCategory::FairlyLow => "fairlylow",
            VoiceCategory::Low => "low",
        }
    }
}

impl FromStr for VoiceCategory {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        VoiceCategory::ALL
            .into_iter()
            .find(|voice| voice.name() == lowered)
            .ok_or_else(|| {
                PitchError::configuration(format!(
                    "unknown voice type {s:?}, expected one of high|fairlyhigh|mid|fairlylow|low"
                ))
            })
    }
}

impl fmt::Display for VoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
