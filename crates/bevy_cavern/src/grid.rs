//! Occupancy grid - per-cell fill state and region assignment.

use crate::config::BorderPolicy;
use crate::coords::{CellPos, CellRect};
use crate::region::RegionId;

/// State of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
  /// Solid terrain.
  #[default]
  Filled,
  /// Empty, waiting for the region tracker to sort it into a room.
  Unassigned,
  /// Empty and part of the given room.
  Room(RegionId),
}

impl Cell {
  #[inline]
  pub fn is_filled(self) -> bool {
    matches!(self, Cell::Filled)
  }

  /// Returns the room this cell belongs to, if any.
  #[inline]
  pub fn region(self) -> Option<RegionId> {
    match self {
      Cell::Room(id) => Some(id),
      _ => None,
    }
  }
}

/// Row-major grid of [`Cell`]s.
///
/// Reads never fail: positions outside the map report the fill state chosen
/// by the [`BorderPolicy`].
pub struct OccupancyGrid {
  width: u32,
  height: u32,
  border: BorderPolicy,
  cells: Box<[Cell]>,
}

impl OccupancyGrid {
  /// Creates a fully filled grid.
  pub fn new(width: u32, height: u32, border: BorderPolicy) -> Self {
    Self {
      width,
      height,
      border,
      cells: vec![Cell::Filled; width as usize * height as usize].into_boxed_slice(),
    }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Number of cells.
  pub fn area(&self) -> usize {
    self.cells.len()
  }

  pub fn border(&self) -> BorderPolicy {
    self.border
  }

  /// Rectangle covering the whole map.
  pub fn bounds(&self) -> CellRect {
    CellRect::new(
      CellPos::new(0, 0),
      CellPos::new(self.width as i32 - 1, self.height as i32 - 1),
    )
  }

  #[inline]
  pub fn is_in_bounds(&self, pos: CellPos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
  }

  #[inline]
  fn index(&self, pos: CellPos) -> Option<usize> {
    self
      .is_in_bounds(pos)
      .then(|| pos.y as usize * self.width as usize + pos.x as usize)
  }

  /// Returns the cell at `pos`, or `None` outside the map.
  #[inline]
  pub fn cell(&self, pos: CellPos) -> Option<Cell> {
    self.index(pos).map(|i| self.cells[i])
  }

  /// Returns whether `pos` is filled. Outside the map this is the border
  /// policy's value.
  #[inline]
  pub fn is_filled(&self, pos: CellPos) -> bool {
    match self.cell(pos) {
      Some(cell) => cell.is_filled(),
      None => self.border.out_of_bounds_filled(),
    }
  }

  /// Returns the room containing `pos`, if any.
  pub fn region_at(&self, pos: CellPos) -> Option<RegionId> {
    self.cell(pos).and_then(Cell::region)
  }

  /// Sets the fill state of a cell and returns its previous state.
  ///
  /// Emptying a filled cell leaves it [`Cell::Unassigned`]; emptying an
  /// already empty cell keeps its assignment. Returns `None` (and writes
  /// nothing) outside the map.
  pub fn set_filled(&mut self, pos: CellPos, filled: bool) -> Option<Cell> {
    let i = self.index(pos)?;
    let previous = self.cells[i];
    self.cells[i] = match (filled, previous) {
      (true, _) => Cell::Filled,
      (false, Cell::Filled) => Cell::Unassigned,
      (false, empty) => empty,
    };
    Some(previous)
  }

  /// Assigns an empty cell to a room.
  pub(crate) fn assign(&mut self, pos: CellPos, region: RegionId) {
    if let Some(i) = self.index(pos) {
      debug_assert!(
        !self.cells[i].is_filled(),
        "assigning filled cell {pos:?} to a room"
      );
      self.cells[i] = Cell::Room(region);
    }
  }

  /// Edge predicate: an empty cell with at least one filled 4-neighbour.
  pub fn is_edge(&self, pos: CellPos) -> bool {
    !self.is_filled(pos) && pos.neighbors().into_iter().any(|n| self.is_filled(n))
  }

  /// Number of filled cells.
  pub fn filled_count(&self) -> usize {
    self.cells.iter().filter(|c| c.is_filled()).count()
  }

  /// Iterates `(position, cell)` pairs in row-major order.
  pub fn iter(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
    let width = self.width as usize;
    self
      .cells
      .iter()
      .enumerate()
      .map(move |(i, cell)| (CellPos::new((i % width) as i32, (i / width) as i32), *cell))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn out_of_bounds_follows_border_policy() {
    let solid = OccupancyGrid::new(4, 4, BorderPolicy::Solid);
    let open = OccupancyGrid::new(4, 4, BorderPolicy::Open);
    let outside = CellPos::new(-1, 2);
    assert!(!solid.is_in_bounds(outside));
    assert!(solid.is_filled(outside));
    assert!(!open.is_filled(outside));
    assert_eq!(solid.cell(CellPos::new(4, 0)), None);
  }

  #[test]
  fn set_filled_reports_previous_state() {
    let mut grid = OccupancyGrid::new(3, 3, BorderPolicy::Solid);
    let pos = CellPos::new(1, 1);
    assert_eq!(grid.set_filled(pos, false), Some(Cell::Filled));
    assert_eq!(grid.cell(pos), Some(Cell::Unassigned));
    assert_eq!(grid.set_filled(pos, false), Some(Cell::Unassigned));
    assert_eq!(grid.set_filled(pos, true), Some(Cell::Unassigned));
    assert_eq!(grid.set_filled(CellPos::new(9, 9), false), None);
    assert_eq!(grid.filled_count(), 9);
  }

  #[test]
  fn edge_predicate_uses_border() {
    let mut solid = OccupancyGrid::new(3, 1, BorderPolicy::Solid);
    let mut open = OccupancyGrid::new(3, 1, BorderPolicy::Open);
    for grid in [&mut solid, &mut open] {
      for x in 0..3 {
        grid.set_filled(CellPos::new(x, 0), false);
      }
    }
    assert!(solid.is_edge(CellPos::new(1, 0)));
    assert!(!open.is_edge(CellPos::new(1, 0)));
    assert!(!open.is_edge(CellPos::new(5, 0)));
  }

  #[test]
  fn iter_is_row_major() {
    let grid = OccupancyGrid::new(3, 2, BorderPolicy::Solid);
    let positions: Vec<_> = grid.iter().map(|(p, _)| p).collect();
    assert_eq!(positions[3], CellPos::new(0, 1));
    assert_eq!(positions.len(), grid.area());
  }
}
