pub mod audio;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod plot;

pub use audio::Signal;
pub use audio::amdf::{AmdfConfig, F0Contour, F0Range};
pub use audio::voice::VoiceCategory;
pub use error::{EstimationFailure, PitchError, PitchResult};
