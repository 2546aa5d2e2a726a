//! Plain-text pose traces.
//!
//! One frame per line: `timestamp yaw pitch roll`, or `timestamp -` for a
//! frame in which no face was detected. Fields may be separated by
//! whitespace or commas. Blank lines and lines starting with `#` are
//! ignored.
//!
//! ```text
//! # t(ms)  yaw   pitch  roll
//! 0        0.0   0.0    0.0
//! 100      12.0  1.5    0.0
//! 200      -
//! ```

use crate::gesture::PoseSample;
use crate::{Error, Result};
use std::path::Path;

/// One line of a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceFrame {
    /// Frame timestamp in milliseconds
    pub timestamp: f64,
    /// Angles `(yaw, pitch, roll)`, `None` when no face was detected
    pub angles: Option<(f64, f64, f64)>,
}

impl TraceFrame {
    /// The pose sample of this frame, if a face was present
    #[must_use]
    pub fn sample(&self) -> Option<PoseSample> {
        self.angles
            .map(|(yaw, pitch, roll)| PoseSample::new(yaw, pitch, roll, self.timestamp))
    }
}

fn parse_number(field: &str, what: &str, line: usize) -> Result<f64> {
    let value: f64 = field.parse().map_err(|_| Error::TraceParseError {
        line,
        message: format!("invalid {what} '{field}'"),
    })?;
    if !value.is_finite() {
        return Err(Error::TraceParseError {
            line,
            message: format!("{what} must be finite, got '{field}'"),
        });
    }
    Ok(value)
}

/// Parse trace text
///
/// # Errors
///
/// Returns `Error::TraceParseError` with the 1-based line number of the first
/// malformed line
pub fn parse_trace(content: &str) -> Result<Vec<TraceFrame>> {
    let mut frames = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = index + 1;
        let text = raw_line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();

        let frame = match fields.as_slice() {
            [timestamp, "-"] => TraceFrame {
                timestamp: parse_number(timestamp, "timestamp", line)?,
                angles: None,
            },
            [timestamp, yaw, pitch, roll] => TraceFrame {
                timestamp: parse_number(timestamp, "timestamp", line)?,
                angles: Some((
                    parse_number(yaw, "yaw", line)?,
                    parse_number(pitch, "pitch", line)?,
                    parse_number(roll, "roll", line)?,
                )),
            },
            _ => {
                return Err(Error::TraceParseError {
                    line,
                    message: format!("expected 'timestamp yaw pitch roll' or 'timestamp -', got '{text}'"),
                })
            }
        };
        frames.push(frame);
    }

    Ok(frames)
}

/// Read and parse a trace file
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read, or a parse error
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceFrame>> {
    let content = std::fs::read_to_string(path)?;
    parse_trace(&content)
}

/// Render frames in the trace format
#[must_use]
pub fn format_trace(frames: &[TraceFrame]) -> String {
    frames
        .iter()
        .map(|frame| match frame.angles {
            Some((yaw, pitch, roll)) => format!("{} {} {} {}\n", frame.timestamp, yaw, pitch, roll),
            None => format!("{} -\n", frame.timestamp),
        })
        .collect()
}
