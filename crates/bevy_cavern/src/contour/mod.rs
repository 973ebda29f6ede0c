//! Contour extraction by boundary walking.
//!
//! Contours are traced from a set of edge tiles (empty cells next to filled
//! terrain). Each walk follows one boundary and consumes every tile it passes,
//! so a region with holes yields one contour per boundary, and a domain edge
//! cuts boundaries into open polylines.
//!
//! Points are in cell space at half-integer offsets; use
//! [`MapTransform`](crate::MapTransform) to place them in the world.

mod domain;
mod walk;

use std::collections::BTreeSet;
use std::fmt;

use bevy::log::warn;
use bevy::math::Vec2;
pub use domain::{ChunkWindow, MapDomain, Probe, TraceDomain};

use crate::coords::CellPos;

/// An ordered boundary polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
  /// Boundary points. For closed contours the last point repeats the first.
  pub points: Vec<Vec2>,
  /// False when the boundary was clipped by the tracing domain.
  pub closed: bool,
}

impl Contour {
  pub fn open(points: Vec<Vec2>) -> Self {
    Self {
      points,
      closed: false,
    }
  }

  pub fn closed(points: Vec<Vec2>) -> Self {
    Self {
      points,
      closed: true,
    }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// Non-fatal problem found while tracing. The affected path is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceDiagnostic {
  /// A starting edge tile has no solid neighbour to follow.
  NoSolidNeighbor { start: CellPos },
  /// The walk exceeded its step budget.
  IterationCap { start: CellPos, cap: usize },
}

impl fmt::Display for TraceDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoSolidNeighbor { start } => {
        write!(f, "edge tile {start:?} has no solid neighbour to trace")
      }
      Self::IterationCap { start, cap } => {
        write!(f, "boundary walk from {start:?} exceeded {cap} steps")
      }
    }
  }
}

/// Contours plus any diagnostics raised while tracing them.
#[derive(Clone, Debug, Default)]
pub struct TraceOutput {
  pub contours: Vec<Contour>,
  pub diagnostics: Vec<TraceDiagnostic>,
}

/// Traces every boundary reachable from `edge_tiles` within `domain`.
///
/// Walks start from the lowest remaining tile in row-major order, which
/// keeps the output stable for a given grid. Diagnostics are logged and
/// returned; they never stop the remaining walks.
pub fn trace_edges<D: TraceDomain + ?Sized>(
  edge_tiles: &BTreeSet<CellPos>,
  domain: &D,
  cap: usize,
) -> TraceOutput {
  let mut remaining = edge_tiles.clone();
  let mut output = TraceOutput::default();

  while let Some(start) = remaining.pop_first() {
    let walk = walk::walk_boundary(domain, start, cap);
    for pos in &walk.visited {
      remaining.remove(pos);
    }
    output.contours.extend(walk.contours);
    if let Some(diagnostic) = walk.diagnostic {
      warn!("{diagnostic}");
      output.diagnostics.push(diagnostic);
    }
  }

  output
}
