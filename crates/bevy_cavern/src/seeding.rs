//! Initial terrain generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::coords::CellPos;
use crate::error::ConfigError;
use crate::grid::OccupancyGrid;

/// Pattern used to fill a freshly created grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedPattern {
  /// Every cell filled; rooms only appear once edits carve them.
  #[default]
  Solid,
  /// Every cell empty except a one-cell ring along the map border.
  Hollow,
  /// Each cell filled independently with probability `density`.
  Noise { density: f32, seed: u64 },
}

impl SeedPattern {
  pub(crate) fn validate(&self) -> Result<(), ConfigError> {
    match self {
      SeedPattern::Noise { density, .. } if !(0.0..=1.0).contains(density) => Err(
        ConfigError::Invalid(format!("noise density must be in [0, 1], got {density}")),
      ),
      _ => Ok(()),
    }
  }

  /// Writes the pattern into `grid`.
  ///
  /// Only touches fill state; region assignment is left to the caller.
  pub fn apply(&self, grid: &mut OccupancyGrid) {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    match self {
      SeedPattern::Solid => {
        for pos in grid.bounds().cells() {
          grid.set_filled(pos, true);
        }
      }
      SeedPattern::Hollow => {
        for pos in grid.bounds().cells() {
          let on_border = pos.x == 0 || pos.y == 0 || pos.x == w - 1 || pos.y == h - 1;
          grid.set_filled(pos, on_border);
        }
      }
      SeedPattern::Noise { density, seed } => {
        let mut rng = StdRng::seed_from_u64(*seed);
        for y in 0..h {
          for x in 0..w {
            let filled = rng.random_bool(f64::from(*density));
            grid.set_filled(CellPos::new(x, y), filled);
          }
        }
      }
    }
  }
}
