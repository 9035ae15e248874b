//! Roster file parsing.
//!
//! Loads an [`InMemoryDirectory`] from a plain-text roster. One
//! declaration per line, `#` starts a comment:
//!
//! ```text
//! # id, name, radius in meters
//! supervisor pp-1 Aamir 100
//! # supervisor id, subordinate id, name
//! subordinate pp-1 pso-1 Bilal
//! ```
//!
//! Supervisors must be declared before their subordinates.

use std::fs;
use std::path::Path;

use fieldwatch::directory::InMemoryDirectory;

/// Error produced while parsing a roster file.
#[derive(Debug)]
pub enum RosterError {
    /// The roster file could not be read.
    Io(std::io::Error),
    /// A line could not be parsed.
    Parse { line: usize, reason: String },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read roster: {}", e),
            Self::Parse { line, reason } => write!(f, "roster line {}: {}", line, reason),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Load a roster file into a fresh directory.
pub fn load_roster(path: &Path) -> Result<InMemoryDirectory, RosterError> {
    let text = fs::read_to_string(path)?;
    parse_roster(&text)
}

/// Parse roster text into a directory.
pub fn parse_roster(text: &str) -> Result<InMemoryDirectory, RosterError> {
    let directory = InMemoryDirectory::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["supervisor", id, name, radius] => {
                let radius_meters: f64 = radius.parse().map_err(|_| RosterError::Parse {
                    line: line_no,
                    reason: format!("invalid radius '{}'", radius),
                })?;
                directory.upsert_supervisor(id, name, radius_meters);
            }
            ["subordinate", supervisor_id, id, name] => {
                directory
                    .assign(supervisor_id, id, name)
                    .map_err(|e| RosterError::Parse {
                        line: line_no,
                        reason: e.to_string(),
                    })?;
            }
            _ => {
                return Err(RosterError::Parse {
                    line: line_no,
                    reason: format!("unrecognized declaration '{}'", line),
                });
            }
        }
    }

    Ok(directory)
}
