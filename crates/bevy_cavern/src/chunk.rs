//! Chunk partition - overlapping fixed-size windows with their own contours.
//!
//! Chunk `c` on an axis covers cells `c * stride ..= c * stride + stride`
//! where `stride = chunk_size - 1`, so neighbouring chunks share one row or
//! column of cells. Contours are traced inside each window independently of
//! the room system; boundaries crossing a seam come out as open polylines
//! that meet on the shared row.

use std::collections::BTreeSet;

use bevy::log::debug;

use crate::contour::{ChunkWindow, Contour, TraceDiagnostic, TraceDomain, trace_edges};
use crate::coords::{CellPos, CellRect};
use crate::grid::OccupancyGrid;

/// Chunk index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
  pub x: u32,
  pub y: u32,
}

impl ChunkPos {
  pub const fn new(x: u32, y: u32) -> Self {
    Self { x, y }
  }
}

/// Inclusive range of chunk indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRange {
  pub min: ChunkPos,
  pub max: ChunkPos,
}

impl ChunkRange {
  /// Number of chunks in the range. Never zero.
  pub fn count(&self) -> usize {
    (self.max.x - self.min.x + 1) as usize * (self.max.y - self.min.y + 1) as usize
  }

  pub fn contains(&self, pos: ChunkPos) -> bool {
    (self.min.x..=self.max.x).contains(&pos.x) && (self.min.y..=self.max.y).contains(&pos.y)
  }

  /// Iterates the range row by row.
  pub fn iter(&self) -> impl Iterator<Item = ChunkPos> + use<> {
    let (min, max) = (self.min, self.max);
    (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| ChunkPos::new(x, y)))
  }
}

/// One chunk window and its cached boundary data.
#[derive(Debug)]
pub struct Chunk {
  pos: ChunkPos,
  window: CellRect,
  edge_tiles: BTreeSet<CellPos>,
  contours: Vec<Contour>,
}

impl Chunk {
  pub fn pos(&self) -> ChunkPos {
    self.pos
  }

  /// Cells covered by this chunk, seams included.
  pub fn window(&self) -> CellRect {
    self.window
  }

  /// Empty cells with a solid neighbour as seen from inside the window.
  pub fn edge_tiles(&self) -> &BTreeSet<CellPos> {
    &self.edge_tiles
  }

  pub fn contours(&self) -> &[Contour] {
    &self.contours
  }
}

/// Every chunk of a map, row-major.
pub struct ChunkPartition {
  chunk_size: u32,
  counts: (u32, u32),
  chunks: Vec<Chunk>,
}

/// Chunks needed along one axis so that windows of `stride + 1` cells cover
/// `cells` cells.
fn axis_count(cells: u32, stride: u32) -> u32 {
  cells.saturating_sub(1).div_ceil(stride).max(1)
}

impl ChunkPartition {
  /// Partitions a `width × height` map. `chunk_size` must be at least 2.
  pub fn new(width: u32, height: u32, chunk_size: u32) -> Self {
    let stride = chunk_size.max(2) - 1;
    let counts = (axis_count(width, stride), axis_count(height, stride));
    let map = CellRect::new(
      CellPos::new(0, 0),
      CellPos::new(width as i32 - 1, height as i32 - 1),
    );

    let mut chunks = Vec::with_capacity(counts.0 as usize * counts.1 as usize);
    for cy in 0..counts.1 {
      for cx in 0..counts.0 {
        let min = CellPos::new((cx * stride) as i32, (cy * stride) as i32);
        let max = CellPos::new(min.x + stride as i32, min.y + stride as i32);
        let Some(window) = CellRect::new(min, max).intersection(&map) else {
          continue;
        };
        chunks.push(Chunk {
          pos: ChunkPos::new(cx, cy),
          window,
          edge_tiles: BTreeSet::new(),
          contours: Vec::new(),
        });
      }
    }

    Self {
      chunk_size: stride + 1,
      counts,
      chunks,
    }
  }

  #[inline]
  fn stride(&self) -> i32 {
    (self.chunk_size - 1) as i32
  }

  pub fn chunk_size(&self) -> u32 {
    self.chunk_size
  }

  /// Number of chunks along x and y.
  pub fn counts(&self) -> (u32, u32) {
    self.counts
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Range covering every chunk.
  pub fn full_range(&self) -> ChunkRange {
    ChunkRange {
      min: ChunkPos::new(0, 0),
      max: ChunkPos::new(self.counts.0 - 1, self.counts.1 - 1),
    }
  }

  pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
    if pos.x >= self.counts.0 || pos.y >= self.counts.1 {
      return None;
    }
    self
      .chunks
      .get(pos.y as usize * self.counts.0 as usize + pos.x as usize)
  }

  fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
    if pos.x >= self.counts.0 || pos.y >= self.counts.1 {
      return None;
    }
    self
      .chunks
      .get_mut(pos.y as usize * self.counts.0 as usize + pos.x as usize)
  }

  /// Iterates every chunk row by row.
  pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
    self.chunks.iter()
  }

  fn axis_range(&self, min: i32, max: i32, count: u32) -> (u32, u32) {
    let last = count as i32 - 1;
    let lo = (min - 1).div_euclid(self.stride()).clamp(0, last);
    let hi = max.div_euclid(self.stride()).clamp(0, last);
    (lo as u32, hi as u32)
  }

  /// Chunks whose windows may be affected by changes inside `rect`.
  ///
  /// Returns `None` if `rect` lies entirely outside the partition.
  pub fn chunk_range(&self, rect: CellRect) -> Option<ChunkRange> {
    let map = self.chunks.last().map(|last| CellRect::new(CellPos::new(0, 0), last.window.max))?;
    let rect = rect.intersection(&map)?;
    let (x0, x1) = self.axis_range(rect.min.x, rect.max.x, self.counts.0);
    let (y0, y1) = self.axis_range(rect.min.y, rect.max.y, self.counts.1);
    Some(ChunkRange {
      min: ChunkPos::new(x0, y0),
      max: ChunkPos::new(x1, y1),
    })
  }

  /// The one, two or four chunks whose windows contain `pos`.
  pub fn chunks_containing(&self, pos: CellPos) -> Vec<ChunkPos> {
    let xs = self.axis_owners(pos.x, self.counts.0);
    let ys = self.axis_owners(pos.y, self.counts.1);
    ys.iter()
      .flat_map(|&y| xs.iter().map(move |&x| ChunkPos::new(x, y)))
      .filter(|chunk| self.get(*chunk).is_some_and(|c| c.window.contains(pos)))
      .collect()
  }

  fn axis_owners(&self, coord: i32, count: u32) -> Vec<u32> {
    if coord < 0 {
      return Vec::new();
    }
    let stride = self.stride();
    let mut owners = Vec::with_capacity(2);
    if coord % stride == 0 && coord > 0 {
      owners.push((coord / stride - 1) as u32);
    }
    owners.push((coord / stride) as u32);
    owners.retain(|c| *c < count);
    owners
  }

  /// Rebuilds edge sets and contours for every chunk in `range`.
  ///
  /// `cap_factor` scales each window's walk budget by its area.
  pub fn recompute(
    &mut self,
    range: ChunkRange,
    grid: &OccupancyGrid,
    cap_factor: u32,
  ) -> Vec<TraceDiagnostic> {
    let mut diagnostics = Vec::new();
    for pos in range.iter() {
      let Some(chunk) = self.get_mut(pos) else {
        continue;
      };
      let domain = ChunkWindow::new(grid, chunk.window);
      chunk.edge_tiles = chunk
        .window
        .cells()
        .filter(|cell| domain.is_edge(*cell))
        .collect();
      let cap = (cap_factor as usize).saturating_mul(domain.area());
      let output = trace_edges(&chunk.edge_tiles, &domain, cap);
      chunk.contours = output.contours;
      diagnostics.extend(output.diagnostics);
    }
    debug!(
      "recomputed {} chunks ({:?}..={:?})",
      range.count(),
      range.min,
      range.max
    );
    diagnostics
  }
}
