//! Error types for edits and configuration.

use std::error::Error;
use std::{fmt, io};

/// Error returned for a malformed edit request.
///
/// Raised before any cell is touched, so a rejected request never leaves the
/// terrain partially edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
  /// The mask has a zero width or height.
  EmptyMask { width: u32, height: u32 },
  /// Mask rows passed to [`EditMask::from_rows`](crate::EditMask::from_rows)
  /// have differing lengths.
  RaggedMask {
    row: usize,
    expected: usize,
    found: usize,
  },
}

impl fmt::Display for EditError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyMask { width, height } => {
        write!(f, "edit mask has a zero dimension ({width}x{height})")
      }
      Self::RaggedMask {
        row,
        expected,
        found,
      } => write!(
        f,
        "edit mask row {row} has {found} cells, expected {expected}"
      ),
    }
  }
}

impl Error for EditError {}

/// Error type for loading or validating a [`CavernConfig`](crate::CavernConfig).
#[derive(Debug)]
pub enum ConfigError {
  /// Reading the config file failed.
  Io(io::Error),
  /// The TOML document could not be parsed.
  Parse(toml::de::Error),
  /// The config parsed but describes an unusable terrain.
  Invalid(String),
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "I/O error: {e}"),
      Self::Parse(e) => write!(f, "invalid config: {e}"),
      Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
    }
  }
}

impl Error for ConfigError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Invalid(_) => None,
    }
  }
}

impl From<io::Error> for ConfigError {
  fn from(err: io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(err: toml::de::Error) -> Self {
    Self::Parse(err)
  }
}
