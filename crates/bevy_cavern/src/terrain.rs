//! The terrain: grid, rooms and chunks kept consistent across edits.
//!
//! [`Terrain::apply_edit`] is the only way to change the grid. Each call
//! writes the masked cells, sorts newly emptied cells into rooms, then
//! recomputes contours for exactly the rooms and chunks around the edit.

use bevy::log::{debug, info, trace};
use bevy::prelude::Resource;

use crate::chunk::{ChunkPartition, ChunkRange};
use crate::config::CavernConfig;
use crate::contour::TraceDiagnostic;
use crate::coords::{CellPos, CellRect, MapTransform};
use crate::edit::EditRequest;
use crate::error::{ConfigError, EditError};
use crate::grid::OccupancyGrid;
use crate::region::{RegionId, RegionTracker};

/// Stage of the edit pipeline. Always `Idle` outside [`Terrain::apply_edit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
  #[default]
  Idle,
  /// Writing masked cells into the grid.
  Applying,
  /// Sorting emptied cells into rooms and recomputing contours.
  Reconciling,
}

/// Everything an edit changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditOutcome {
  /// Cells whose fill state flipped.
  pub changed_cells: usize,
  /// Mask rectangle grown by one cell and clipped to the map. `None` when
  /// nothing changed.
  pub dirty: Option<CellRect>,
  /// Rooms created by this edit.
  pub created: Vec<RegionId>,
  /// Rooms absorbed into a neighbour.
  pub merged: Vec<RegionId>,
  /// Rooms whose last cell was filled.
  pub destroyed: Vec<RegionId>,
  /// Rooms whose contours were recomputed.
  pub retraced: Vec<RegionId>,
  /// Chunks whose contours were recomputed.
  pub chunks: Option<ChunkRange>,
  pub diagnostics: Vec<TraceDiagnostic>,
}

impl EditOutcome {
  /// True if the edit changed no cell.
  pub fn is_noop(&self) -> bool {
    self.changed_cells == 0
  }
}

fn push_unique(ids: &mut Vec<RegionId>, id: RegionId) {
  if !ids.contains(&id) {
    ids.push(id);
  }
}

/// Destructible terrain with incremental room and chunk tracking.
#[derive(Resource)]
pub struct Terrain {
  config: CavernConfig,
  grid: OccupancyGrid,
  regions: RegionTracker,
  chunks: ChunkPartition,
  transform: MapTransform,
  state: PipelineState,
}

impl Terrain {
  /// Builds the terrain described by `config`, with every room and contour
  /// computed.
  pub fn new(config: CavernConfig) -> Result<Self, ConfigError> {
    config.validate()?;

    let mut grid = OccupancyGrid::new(config.width, config.height, config.border);
    config.seed.apply(&mut grid);

    let mut terrain = Self {
      regions: RegionTracker::new(),
      chunks: ChunkPartition::new(config.width, config.height, config.chunk_size),
      transform: MapTransform::centered(config.width, config.height),
      state: PipelineState::Idle,
      grid,
      config,
    };
    let diagnostics = terrain.rebuild();

    info!(
      "terrain ready: {}x{} cells, {} rooms, {} chunks, {} trace diagnostics",
      terrain.grid.width(),
      terrain.grid.height(),
      terrain.regions.len(),
      terrain.chunks.len(),
      diagnostics.len()
    );
    Ok(terrain)
  }

  /// Recomputes all rooms, contours and chunks from the grid alone.
  fn rebuild(&mut self) -> Vec<TraceDiagnostic> {
    let mut diagnostics = Vec::new();
    self.regions = RegionTracker::new();

    if self.config.track_regions {
      let empty: Vec<CellPos> = self
        .grid
        .iter()
        .filter(|(_, cell)| !cell.is_filled())
        .map(|(pos, _)| pos)
        .collect();
      for pos in empty {
        self.regions.queue(pos);
      }
      self.regions.reconcile(&mut self.grid);
      let cap = self.config.walk_cap(self.grid.area());
      for id in self.regions.ids_by_serial() {
        diagnostics.extend(self.regions.retrace(id, &self.grid, cap));
      }
    }

    if self.config.track_chunks {
      let range = self.chunks.full_range();
      diagnostics.extend(self.chunks.recompute(range, &self.grid, self.config.walk_cap_factor));
    }
    diagnostics
  }

  fn transition(&mut self, next: PipelineState) {
    trace!("terrain pipeline {:?} -> {:?}", self.state, next);
    self.state = next;
  }

  /// Applies a masked edit.
  ///
  /// Mask cells outside the map are skipped. A mask with a zero dimension is
  /// rejected before any cell is written.
  pub fn apply_edit(&mut self, request: &EditRequest) -> Result<EditOutcome, EditError> {
    let Some(mask_rect) = request.rect() else {
      return Err(EditError::EmptyMask {
        width: request.mask.width(),
        height: request.mask.height(),
      });
    };

    self.transition(PipelineState::Applying);
    let target = request.target_filled();
    let mut outcome = EditOutcome::default();
    let mut touched = Vec::new();

    for pos in request.targets() {
      let Some(previous) = self.grid.cell(pos) else {
        continue;
      };
      if previous.is_filled() == target {
        continue;
      }
      self.grid.set_filled(pos, target);
      outcome.changed_cells += 1;

      if !self.config.track_regions {
        continue;
      }
      if target {
        if let Some(id) = previous.region() {
          if self.regions.remove_tile(id, pos) {
            outcome.destroyed.push(id);
          } else {
            push_unique(&mut touched, id);
          }
        }
      } else {
        self.regions.queue(pos);
      }
    }

    let dirty = match mask_rect.expanded(1).intersection(&self.grid.bounds()) {
      Some(dirty) if outcome.changed_cells > 0 => dirty,
      _ => {
        self.transition(PipelineState::Idle);
        return Ok(outcome);
      }
    };
    outcome.dirty = Some(dirty);

    self.transition(PipelineState::Reconciling);
    if self.config.track_regions {
      let report = self.regions.reconcile(&mut self.grid);
      for &id in report.created.iter().chain(&report.touched) {
        push_unique(&mut touched, id);
      }
      for pos in dirty.cells() {
        if let Some(id) = self.grid.region_at(pos) {
          push_unique(&mut touched, id);
        }
      }
      touched.retain(|id| self.regions.contains(*id));
      outcome.created = report.created;
      outcome.merged = report.merged;

      let cap = self.config.walk_cap(self.grid.area());
      for id in touched {
        self.regions.refresh_edges(id, dirty, &self.grid);
        outcome
          .diagnostics
          .extend(self.regions.retrace(id, &self.grid, cap));
        outcome.retraced.push(id);
      }
    }

    if self.config.track_chunks {
      if let Some(range) = self.chunks.chunk_range(dirty) {
        outcome.diagnostics.extend(self.chunks.recompute(
          range,
          &self.grid,
          self.config.walk_cap_factor,
        ));
        outcome.chunks = Some(range);
      }
    }

    self.transition(PipelineState::Idle);
    debug!(
      "edit changed {} cells in {:?}: {} rooms retraced, {} diagnostics",
      outcome.changed_cells,
      dirty,
      outcome.retraced.len(),
      outcome.diagnostics.len()
    );
    Ok(outcome)
  }

  pub fn config(&self) -> &CavernConfig {
    &self.config
  }

  pub fn grid(&self) -> &OccupancyGrid {
    &self.grid
  }

  /// Rooms and their contours.
  pub fn regions(&self) -> &RegionTracker {
    &self.regions
  }

  /// Chunks and their contours.
  pub fn chunks(&self) -> &ChunkPartition {
    &self.chunks
  }

  pub fn transform(&self) -> &MapTransform {
    &self.transform
  }

  pub fn state(&self) -> PipelineState {
    self.state
  }

  pub fn is_in_bounds(&self, pos: CellPos) -> bool {
    self.grid.is_in_bounds(pos)
  }

  /// Room containing `pos`, if any.
  pub fn region_at(&self, pos: CellPos) -> Option<RegionId> {
    self.grid.region_at(pos)
  }

  /// Cell under a world-space point, clamped into the map.
  pub fn world_to_cell(&self, world: bevy::math::Vec2) -> CellPos {
    self.transform.world_to_cell(world)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edit::{Brush, EditMask};
  use crate::seeding::SeedPattern;

  fn small() -> CavernConfig {
    CavernConfig::for_chunk_counts(2, 2, 8)
  }

  #[test]
  fn solid_terrain_starts_without_rooms() {
    let terrain = Terrain::new(small()).unwrap();
    assert_eq!(terrain.grid().width(), 15);
    assert!(terrain.regions().is_empty());
    assert_eq!(terrain.chunks().len(), 4);
    assert!(terrain.chunks().iter().all(|c| c.contours().is_empty()));
    assert_eq!(terrain.state(), PipelineState::Idle);
  }

  #[test]
  fn rebuild_traces_noise_without_diagnostics() {
    let config = small().with_seed(SeedPattern::Noise {
      density: 0.45,
      seed: 11,
    });
    let mut terrain = Terrain::new(config).unwrap();
    let rooms = terrain.regions().len();
    assert!(terrain.rebuild().is_empty());
    assert_eq!(terrain.regions().len(), rooms);
  }

  #[test]
  fn hollow_terrain_starts_with_one_room() {
    let terrain = Terrain::new(small().with_seed(SeedPattern::Hollow)).unwrap();
    assert_eq!(terrain.regions().len(), 1);
    let (_, room) = terrain.regions().iter().next().unwrap();
    assert_eq!(room.len(), 13 * 13);
    assert_eq!(room.contours().len(), 1);
  }

  #[test]
  fn invalid_config_is_rejected() {
    let result = Terrain::new(small().with_chunk_size(1));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
  }

  #[test]
  fn empty_mask_is_rejected_untouched() {
    let mut terrain = Terrain::new(small()).unwrap();
    let request = EditRequest::carve(CellPos::new(2, 2), EditMask::filled(0, 3));
    assert_eq!(
      terrain.apply_edit(&request),
      Err(EditError::EmptyMask {
        width: 0,
        height: 3
      })
    );
    assert_eq!(terrain.grid().filled_count(), terrain.grid().area());
    assert_eq!(terrain.state(), PipelineState::Idle);
  }

  #[test]
  fn carve_reports_room_and_chunks() {
    let mut terrain = Terrain::new(small()).unwrap();
    let request = EditRequest::centered(CellPos::new(3, 3), Brush::Square3.mask(), true);
    let outcome = terrain.apply_edit(&request).unwrap();

    assert_eq!(outcome.changed_cells, 9);
    assert_eq!(
      outcome.dirty,
      Some(CellRect::new(CellPos::new(1, 1), CellPos::new(5, 5)))
    );
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.retraced, outcome.created);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(terrain.regions().get(outcome.created[0]).unwrap().contours().len(), 1);
    let chunk = terrain.chunks().iter().next().unwrap();
    assert_eq!(chunk.contours().len(), 1);
    assert!(chunk.contours()[0].closed);
  }

  #[test]
  fn repeating_an_edit_changes_nothing() {
    let mut terrain = Terrain::new(small()).unwrap();
    let request = EditRequest::centered(CellPos::new(7, 7), Brush::Diamond5.mask(), true);
    terrain.apply_edit(&request).unwrap();
    let again = terrain.apply_edit(&request).unwrap();
    assert!(again.is_noop());
    assert_eq!(again.dirty, None);
  }

  #[test]
  fn filling_whole_room_destroys_it() {
    let mut terrain = Terrain::new(small()).unwrap();
    let carve = EditRequest::centered(CellPos::new(7, 7), Brush::Cross.mask(), true);
    let id = terrain.apply_edit(&carve).unwrap().created[0];
    let fill = EditRequest::centered(CellPos::new(7, 7), Brush::Square3.mask(), false);
    let outcome = terrain.apply_edit(&fill).unwrap();
    assert_eq!(outcome.changed_cells, 5);
    assert_eq!(outcome.destroyed, vec![id]);
    assert!(outcome.retraced.is_empty());
    assert!(terrain.regions().is_empty());
  }

  #[test]
  fn untracked_regions_still_edit_the_grid() {
    let mut terrain = Terrain::new(small().with_tracking(false, true)).unwrap();
    let request = EditRequest::centered(CellPos::new(7, 7), Brush::Square3.mask(), true);
    let outcome = terrain.apply_edit(&request).unwrap();
    assert_eq!(outcome.changed_cells, 9);
    assert!(terrain.regions().is_empty());
    assert_eq!(terrain.regions().pending_len(), 0);
    assert_eq!(outcome.chunks.map(|r| r.count()), Some(4));
  }
}
