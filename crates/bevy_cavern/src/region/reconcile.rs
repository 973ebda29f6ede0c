//! Batched reconciliation of newly emptied cells into rooms.
//!
//! Every pending cell that is still unassigned seeds a flood fill over the
//! unassigned cells around it. The fill stops at filled terrain and at
//! assigned cells, recording which rooms it bumped into:
//! - no rooms: the flooded cells become a new room
//! - one or more: the largest room absorbs the flood and all other rooms

use std::collections::{HashSet, VecDeque};
use std::mem;

use bevy::log::debug;

use super::{RegionId, RegionTracker};
use crate::coords::CellPos;
use crate::grid::{Cell, OccupancyGrid};

/// What a call to [`RegionTracker::reconcile`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
  /// Rooms created by this batch.
  pub created: Vec<RegionId>,
  /// Rooms absorbed into another room and deleted.
  pub merged: Vec<RegionId>,
  /// Live pre-existing rooms that gained cells.
  pub touched: Vec<RegionId>,
  /// Number of cells assigned or reassigned.
  pub assigned: usize,
}

impl ReconcileReport {
  /// True if nothing changed.
  pub fn is_empty(&self) -> bool {
    self.created.is_empty() && self.merged.is_empty() && self.touched.is_empty()
  }
}

/// Cells reached by one flood fill and the rooms bordering them.
struct Flood {
  cells: Vec<CellPos>,
  /// Bordering rooms, in encounter order.
  touched: Vec<RegionId>,
}

fn flood(grid: &OccupancyGrid, seed: CellPos) -> Flood {
  let mut cells = Vec::new();
  let mut touched = Vec::new();
  let mut seen = HashSet::from([seed]);
  let mut queue = VecDeque::from([seed]);

  while let Some(pos) = queue.pop_front() {
    cells.push(pos);
    for n in pos.neighbors() {
      match grid.cell(n) {
        Some(Cell::Unassigned) => {
          if seen.insert(n) {
            queue.push_back(n);
          }
        }
        Some(Cell::Room(id)) => {
          if !touched.contains(&id) {
            touched.push(id);
          }
        }
        Some(Cell::Filled) | None => {}
      }
    }
  }

  Flood { cells, touched }
}

impl RegionTracker {
  /// Sorts every queued cell into a room, creating and merging rooms as
  /// needed. Drains the whole queue.
  pub fn reconcile(&mut self, grid: &mut OccupancyGrid) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for seed in mem::take(&mut self.pending) {
      // Already swept up by an earlier flood, or refilled since queueing.
      if grid.cell(seed) != Some(Cell::Unassigned) {
        continue;
      }
      let flood = flood(grid, seed);
      report.assigned += flood.cells.len();

      match self.pick_survivor(&flood.touched) {
        None => {
          let id = self.create();
          for &pos in &flood.cells {
            grid.assign(pos, id);
          }
          if let Some(region) = self.regions.get_mut(id) {
            region.edge_tiles.extend(flood.cells.iter().copied().filter(|p| grid.is_edge(*p)));
            region.tiles.extend(flood.cells);
          }
          report.created.push(id);
        }
        Some(survivor) => {
          let mut reassigned = flood.cells;
          for &loser in flood.touched.iter().filter(|id| **id != survivor) {
            if let Some(absorbed) = self.regions.remove(loser) {
              report.assigned += absorbed.tiles.len();
              reassigned.extend(absorbed.tiles);
              report.merged.push(loser);
            }
          }
          for &pos in &reassigned {
            grid.assign(pos, survivor);
          }
          if let Some(region) = self.regions.get_mut(survivor) {
            region.edge_tiles.retain(|p| grid.is_edge(*p));
            region.edge_tiles.extend(reassigned.iter().copied().filter(|p| grid.is_edge(*p)));
            region.tiles.extend(reassigned);
          }
          if !report.touched.contains(&survivor) {
            report.touched.push(survivor);
          }
        }
      }
    }

    report.touched.retain(|id| self.regions.contains_key(*id));
    report.created.retain(|id| self.regions.contains_key(*id));

    if !report.is_empty() {
      debug!(
        "reconciled {} cells: {} rooms created, {} merged, {} grown",
        report.assigned,
        report.created.len(),
        report.merged.len(),
        report.touched.len()
      );
    }
    report
  }

  /// Largest of `touched`; ties go to the oldest room.
  fn pick_survivor(&self, touched: &[RegionId]) -> Option<RegionId> {
    touched
      .iter()
      .filter_map(|id| self.regions.get(*id).map(|region| (*id, region)))
      .max_by(|(_, a), (_, b)| {
        a.tiles
          .len()
          .cmp(&b.tiles.len())
          .then(b.serial.cmp(&a.serial))
      })
      .map(|(id, _)| id)
  }
}
