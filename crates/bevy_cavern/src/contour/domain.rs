//! Tracing domains - what the boundary walk is allowed to see.

use crate::coords::{CellPos, CellRect};
use crate::grid::OccupancyGrid;

/// Classification of a cell from inside a tracing domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
  /// Beyond the domain edge; the walk clips here.
  Outside,
  /// Filled terrain (or a solid map border).
  Solid,
  /// Empty and walkable.
  Open,
}

/// A region of the grid that contours are traced within.
pub trait TraceDomain {
  /// Classifies `pos`.
  fn probe(&self, pos: CellPos) -> Probe;

  /// Number of cells in the domain; scales the walk step budget.
  fn area(&self) -> usize;

  /// Edge predicate inside this domain: an open cell with a solid
  /// 4-neighbour.
  fn is_edge(&self, pos: CellPos) -> bool {
    self.probe(pos) == Probe::Open
      && pos
        .neighbors()
        .into_iter()
        .any(|n| self.probe(n) == Probe::Solid)
  }
}

fn probe_grid(grid: &OccupancyGrid, pos: CellPos) -> Option<Probe> {
  grid.cell(pos).map(|cell| {
    if cell.is_filled() {
      Probe::Solid
    } else {
      Probe::Open
    }
  })
}

fn probe_border(grid: &OccupancyGrid) -> Probe {
  if grid.border().out_of_bounds_filled() {
    Probe::Solid
  } else {
    Probe::Outside
  }
}

/// The whole map. Used for room contours.
pub struct MapDomain<'a> {
  grid: &'a OccupancyGrid,
}

impl<'a> MapDomain<'a> {
  pub fn new(grid: &'a OccupancyGrid) -> Self {
    Self { grid }
  }
}

impl TraceDomain for MapDomain<'_> {
  fn probe(&self, pos: CellPos) -> Probe {
    probe_grid(self.grid, pos).unwrap_or_else(|| probe_border(self.grid))
  }

  fn area(&self) -> usize {
    self.grid.area()
  }
}

/// A chunk window. Cells beyond the window are outside, except beyond the
/// map border where the border policy applies.
pub struct ChunkWindow<'a> {
  grid: &'a OccupancyGrid,
  window: CellRect,
}

impl<'a> ChunkWindow<'a> {
  /// Creates a window domain; `window` is expected to lie within the map.
  pub fn new(grid: &'a OccupancyGrid, window: CellRect) -> Self {
    Self { grid, window }
  }
}

impl TraceDomain for ChunkWindow<'_> {
  fn probe(&self, pos: CellPos) -> Probe {
    if self.window.contains(pos) {
      probe_grid(self.grid, pos).unwrap_or(Probe::Outside)
    } else if !self.grid.is_in_bounds(pos) {
      probe_border(self.grid)
    } else {
      Probe::Outside
    }
  }

  fn area(&self) -> usize {
    self.window.area()
  }
}
