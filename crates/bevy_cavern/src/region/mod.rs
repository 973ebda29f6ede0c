//! Rooms - connected empty regions of the grid, maintained incrementally.
//!
//! Cells that become empty are queued and sorted into rooms in batches by
//! [`RegionTracker::reconcile`]. Rooms live in a generation-checked arena, so
//! a [`RegionId`] held across edits can never alias a newer room.

mod reconcile;

use std::collections::{BTreeSet, HashSet};

use slotmap::SlotMap;

pub use reconcile::ReconcileReport;

use crate::contour::{Contour, MapDomain, TraceDiagnostic, trace_edges};
use crate::coords::{CellPos, CellRect};
use crate::grid::OccupancyGrid;

slotmap::new_key_type! {
  /// Generation-checked handle to a room.
  pub struct RegionId;
}

/// A room: a 4-connected set of empty cells.
#[derive(Debug, Default)]
pub struct Region {
  serial: u64,
  tiles: HashSet<CellPos>,
  edge_tiles: BTreeSet<CellPos>,
  contours: Vec<Contour>,
}

impl Region {
  /// Creation order of this room. Never reused.
  pub fn serial(&self) -> u64 {
    self.serial
  }

  /// Every cell in the room.
  pub fn tiles(&self) -> &HashSet<CellPos> {
    &self.tiles
  }

  /// Cells of the room that touch filled terrain.
  pub fn edge_tiles(&self) -> &BTreeSet<CellPos> {
    &self.edge_tiles
  }

  /// Boundary polylines, as of the last retrace.
  pub fn contours(&self) -> &[Contour] {
    &self.contours
  }

  /// Number of cells.
  pub fn len(&self) -> usize {
    self.tiles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tiles.is_empty()
  }
}

/// Owner of all rooms and of the queue of cells waiting to join one.
#[derive(Default)]
pub struct RegionTracker {
  regions: SlotMap<RegionId, Region>,
  pending: Vec<CellPos>,
  next_serial: u64,
}

impl RegionTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, id: RegionId) -> Option<&Region> {
    self.regions.get(id)
  }

  pub fn contains(&self, id: RegionId) -> bool {
    self.regions.contains_key(id)
  }

  /// Iterates rooms in creation order.
  pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> + '_ {
    self
      .ids_by_serial()
      .into_iter()
      .filter_map(move |id| self.regions.get(id).map(|region| (id, region)))
  }

  /// Room ids ordered by creation.
  pub fn ids_by_serial(&self) -> Vec<RegionId> {
    let mut ids: Vec<RegionId> = self.regions.keys().collect();
    ids.sort_by_key(|id| self.regions[*id].serial);
    ids
  }

  pub fn len(&self) -> usize {
    self.regions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.regions.is_empty()
  }

  /// Number of emptied cells not yet sorted into a room.
  pub fn pending_len(&self) -> usize {
    self.pending.len()
  }

  /// Queues a newly emptied cell for the next [`reconcile`](Self::reconcile).
  pub fn queue(&mut self, pos: CellPos) {
    self.pending.push(pos);
  }

  fn create(&mut self) -> RegionId {
    let serial = self.next_serial;
    self.next_serial += 1;
    self.regions.insert(Region {
      serial,
      ..Region::default()
    })
  }

  /// Removes a cell that has been filled from its room.
  ///
  /// Returns true if that emptied and destroyed the room. The room is not
  /// split even if the cell was its only connection between two parts.
  pub fn remove_tile(&mut self, id: RegionId, pos: CellPos) -> bool {
    let Some(region) = self.regions.get_mut(id) else {
      return false;
    };
    region.tiles.remove(&pos);
    region.edge_tiles.remove(&pos);
    if region.tiles.is_empty() {
      self.regions.remove(id);
      return true;
    }
    false
  }

  /// Re-evaluates the edge predicate for the room's cells inside `rect`.
  pub fn refresh_edges(&mut self, id: RegionId, rect: CellRect, grid: &OccupancyGrid) {
    let Some(region) = self.regions.get_mut(id) else {
      return;
    };
    for pos in rect.cells() {
      if grid.region_at(pos) != Some(id) {
        continue;
      }
      if grid.is_edge(pos) {
        region.edge_tiles.insert(pos);
      } else {
        region.edge_tiles.remove(&pos);
      }
    }
  }

  /// Recomputes the room's contours from its edge tiles.
  pub fn retrace(&mut self, id: RegionId, grid: &OccupancyGrid, cap: usize) -> Vec<TraceDiagnostic> {
    let Some(region) = self.regions.get_mut(id) else {
      return Vec::new();
    };
    let output = trace_edges(&region.edge_tiles, &MapDomain::new(grid), cap);
    region.contours = output.contours;
    output.diagnostics
  }
}
