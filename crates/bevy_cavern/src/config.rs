//! Terrain configuration.
//!
//! [`CavernConfig`] is plain data: it can be built in code with the `with_*`
//! helpers or loaded from a TOML document.
//!
//! ```toml
//! width = 57
//! height = 29
//! chunk_size = 8
//! border = "solid"
//!
//! [seed]
//! kind = "noise"
//! density = 0.4
//! seed = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::seeding::SeedPattern;

/// How cells outside the map are treated.
///
/// Decides both the edge predicate (is a cell on the map border an edge
/// tile?) and contour clipping (does a room touching the border get a closed
/// loop along it, or an open polyline that stops at the border?).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderPolicy {
  /// Out-of-map cells read as filled; rooms are sealed by the map border.
  #[default]
  Solid,
  /// Out-of-map cells are outside every tracing domain; contours touching the
  /// border are clipped into open polylines.
  Open,
}

impl BorderPolicy {
  /// Fill state reported for positions outside the map.
  pub fn out_of_bounds_filled(self) -> bool {
    matches!(self, BorderPolicy::Solid)
  }
}

/// Configuration for a [`Terrain`](crate::Terrain).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavernConfig {
  /// Map width in cells.
  pub width: u32,
  /// Map height in cells.
  pub height: u32,
  /// Cells per chunk side, including the cell shared with each neighbour.
  /// Default: 8
  pub chunk_size: u32,
  /// Treatment of positions outside the map.
  pub border: BorderPolicy,
  /// Contour walks give up after `walk_cap_factor × domain area` steps.
  /// Default: 10
  pub walk_cap_factor: u32,
  /// Maintain rooms (connected empty regions) and their contours.
  pub track_regions: bool,
  /// Maintain per-chunk edge sets and contours.
  pub track_chunks: bool,
  /// Initial terrain.
  pub seed: SeedPattern,
}

impl Default for CavernConfig {
  fn default() -> Self {
    Self::for_chunk_counts(8, 8, 8)
  }
}

impl CavernConfig {
  /// Config sized to exactly fit `chunks_x × chunks_y` overlapping chunks.
  ///
  /// Neighbouring chunks share one row/column of cells, so each dimension is
  /// `count * chunk_size - (count - 1)`.
  pub fn for_chunk_counts(chunks_x: u32, chunks_y: u32, chunk_size: u32) -> Self {
    let span = |count: u32| count * chunk_size - count.saturating_sub(1);
    Self {
      width: span(chunks_x),
      height: span(chunks_y),
      chunk_size,
      border: BorderPolicy::default(),
      walk_cap_factor: 10,
      track_regions: true,
      track_chunks: true,
      seed: SeedPattern::default(),
    }
  }

  /// Sets the map size in cells.
  pub fn with_size(mut self, width: u32, height: u32) -> Self {
    self.width = width;
    self.height = height;
    self
  }

  /// Sets the chunk size.
  pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  /// Sets the border policy.
  pub fn with_border(mut self, border: BorderPolicy) -> Self {
    self.border = border;
    self
  }

  /// Sets the initial terrain.
  pub fn with_seed(mut self, seed: SeedPattern) -> Self {
    self.seed = seed;
    self
  }

  /// Sets the contour walk cap factor.
  pub fn with_walk_cap_factor(mut self, factor: u32) -> Self {
    self.walk_cap_factor = factor;
    self
  }

  /// Enables or disables room tracking and chunk tracking.
  pub fn with_tracking(mut self, regions: bool, chunks: bool) -> Self {
    self.track_regions = regions;
    self.track_chunks = chunks;
    self
  }

  /// Checks that the config describes a usable terrain.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.width == 0 || self.height == 0 {
      return Err(ConfigError::Invalid(format!(
        "map size must be non-zero, got {}x{}",
        self.width, self.height
      )));
    }
    if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
      return Err(ConfigError::Invalid(format!(
        "map size {}x{} exceeds the addressable cell range",
        self.width, self.height
      )));
    }
    if self.chunk_size < 2 {
      return Err(ConfigError::Invalid(format!(
        "chunk_size must be at least 2, got {}",
        self.chunk_size
      )));
    }
    if self.walk_cap_factor == 0 {
      return Err(ConfigError::Invalid(
        "walk_cap_factor must be at least 1".into(),
      ));
    }
    self.seed.validate()
  }

  /// Step budget for a contour walk over a domain of `area` cells.
  pub fn walk_cap(&self, area: usize) -> usize {
    (self.walk_cap_factor as usize).saturating_mul(area.max(1))
  }

  /// Parses and validates a TOML document.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    let config: CavernConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a TOML config file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_toml_str(&contents)
  }

  /// Serializes the config as pretty TOML.
  pub fn to_toml_string(&self) -> Result<String, ConfigError> {
    toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chunk_count_sizing_shares_seams() {
    let config = CavernConfig::for_chunk_counts(3, 2, 8);
    assert_eq!(config.width, 22);
    assert_eq!(config.height, 15);
    assert_eq!(CavernConfig::for_chunk_counts(1, 1, 8).width, 8);
  }

  #[test]
  fn partial_toml_falls_back_to_defaults() {
    let config = CavernConfig::from_toml_str("width = 12\nheight = 9\nborder = \"open\"").unwrap();
    assert_eq!(config.width, 12);
    assert_eq!(config.height, 9);
    assert_eq!(config.border, BorderPolicy::Open);
    assert_eq!(config.chunk_size, 8);
    assert!(config.track_regions && config.track_chunks);
  }

  #[test]
  fn noise_seed_parses_from_table() {
    let config =
      CavernConfig::from_toml_str("[seed]\nkind = \"noise\"\ndensity = 0.25\nseed = 3").unwrap();
    assert_eq!(
      config.seed,
      SeedPattern::Noise {
        density: 0.25,
        seed: 3
      }
    );
  }

  #[test]
  fn invalid_values_are_rejected() {
    assert!(matches!(
      CavernConfig::from_toml_str("width = 0"),
      Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
      CavernConfig::from_toml_str("chunk_size = 1"),
      Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
      CavernConfig::from_toml_str("width = \"wide\""),
      Err(ConfigError::Parse(_))
    ));
  }

  #[test]
  fn toml_round_trip_preserves_config() {
    let config = CavernConfig::default()
      .with_size(20, 10)
      .with_border(BorderPolicy::Open)
      .with_seed(SeedPattern::Hollow);
    let text = config.to_toml_string().unwrap();
    assert_eq!(CavernConfig::from_toml_str(&text).unwrap(), config);
  }
}
