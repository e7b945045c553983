//! CSV export of an F0 contour.
//!
//! The table has two comma-separated rows: time offsets first, frequencies
//! second.
//!
//! ```text
//! speech-<label>,0.0,0.01,0.02
//! <label>,0.0,201.26,199.5
//! ```

use crate::audio::amdf::F0Contour;
use crate::error::{PitchError, PitchResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub fn csv_file_name(label: &str) -> String {
    format!("speech-f0estimate-{label}.csv")
}

/// Writes the two-row table to `writer`.
pub fn write_csv<W: Write>(contour: &F0Contour, label: &str, mut writer: W) -> PitchResult<()> {
    let mut header = format!("speech-{label}");
    for time in contour.times() {
        header.push(',');
        header.push_str(&format!("{time:?}"));
    }

    let mut data = label.to_string();
    for f0 in contour.f0() {
        data.push(',');
        data.push_str(&format!("{f0:?}"));
    }

    writeln!(writer, "{header}")?;
    writeln!(writer, "{data}")?;
    writer.flush()?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(contour: &F0Contour, label: &str, path: P) -> PitchResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| PitchError::output(format!("failed to create {:?}: {e}", path)))?;
    write_csv(contour, label, BufWriter::new(file))?;
    debug!(path = ?path, frames = contour.len(), "Saved F0 contour");
    Ok(())
}
