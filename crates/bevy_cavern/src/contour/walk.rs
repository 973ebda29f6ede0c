//! Boundary walk - a 4-direction wall follower over a [`TraceDomain`].
//!
//! The walker keeps the filled terrain on one side. At each step it probes
//! the cell in its current direction:
//! - solid: emit the boundary point halfway to it, rotate clockwise
//! - open: move into it, rotate counter-clockwise
//! - outside: clip the current path at the domain edge, rotate clockwise
//!
//! A walk ends once the step that started it has been repeated, so closed
//! loops end on their first point.

use std::mem;

use bevy::math::Vec2;

use super::domain::{Probe, TraceDomain};
use super::{Contour, TraceDiagnostic};
use crate::coords::{CellPos, Direction};

/// Result of a single walk.
pub(crate) struct Walk {
  pub contours: Vec<Contour>,
  /// Every cell the walk stood on, starting cell included.
  pub visited: Vec<CellPos>,
  pub diagnostic: Option<TraceDiagnostic>,
}

/// Accumulates boundary points into paths, collapsing straight runs.
#[derive(Default)]
struct PathBuilder {
  /// First path of a clipped walk. It begins mid-segment at the walk start
  /// and is joined onto the trailing path when the walk completes.
  leading: Option<Vec<Vec2>>,
  finished: Vec<Vec<Vec2>>,
  current: Vec<Vec2>,
  last_dir: Option<Direction>,
  aligned: bool,
}

impl PathBuilder {
  /// Places a wall point seen in direction `dir`. Consecutive points in the
  /// same direction form a straight run; only the run's first and latest
  /// points are kept.
  fn place(&mut self, point: Vec2, dir: Direction) {
    if self.last_dir == Some(dir) {
      if self.aligned {
        self.current.pop();
      } else {
        self.aligned = true;
      }
    } else {
      self.aligned = false;
    }
    self.last_dir = Some(dir);
    self.current.push(point);
  }

  /// Ends the current path at the domain edge.
  fn terminate(&mut self, point: Vec2) {
    self.current.push(point);
    self.last_dir = None;
    self.aligned = false;
  }

  /// Starts a new path after re-entering the domain.
  fn begin(&mut self, seed: Option<Vec2>) {
    let done = mem::take(&mut self.current);
    if self.leading.is_none() {
      self.leading = Some(done);
    } else if done.len() >= 2 {
      self.finished.push(done);
    }
    self.current.extend(seed);
    self.last_dir = None;
    self.aligned = false;
  }

  fn abort(&mut self) {
    self.current.clear();
  }

  fn finish(mut self, aborted: bool) -> Vec<Contour> {
    let mut contours: Vec<Contour> = self.finished.drain(..).map(Contour::open).collect();
    match self.leading {
      None if !aborted && self.current.len() >= 2 => contours.push(Contour::closed(self.current)),
      None => {}
      Some(leading) => {
        let mut tail = self.current;
        let skip = usize::from(tail.last().is_some() && tail.last() == leading.first());
        tail.extend(leading.into_iter().skip(skip));
        if tail.len() >= 2 {
          contours.push(Contour::open(tail));
        }
      }
    }
    contours
  }
}

/// Walks the boundary that `start` lies on.
///
/// `cap` bounds the number of steps; exceeding it drops the path in progress
/// and reports [`TraceDiagnostic::IterationCap`].
pub(crate) fn walk_boundary<D: TraceDomain + ?Sized>(
  domain: &D,
  start: CellPos,
  cap: usize,
) -> Walk {
  let mut visited = vec![start];

  let Some(start_dir) = Direction::ALL
    .into_iter()
    .find(|dir| domain.probe(start.step(*dir)) == Probe::Solid)
  else {
    return Walk {
      contours: Vec::new(),
      visited,
      diagnostic: Some(TraceDiagnostic::NoSolidNeighbor { start }),
    };
  };

  let mut paths = PathBuilder::default();
  let mut cur = start;
  let mut dir = start_dir;
  let mut outside = false;
  let mut edge_point = None;
  let mut diagnostic = None;

  for step in 0.. {
    if step >= cap {
      paths.abort();
      diagnostic = Some(TraceDiagnostic::IterationCap { start, cap });
      break;
    }
    let closing = step > 0 && cur == start && dir == start_dir;
    let boundary = cur.center() + dir.half_step();
    let next = cur.step(dir);

    match domain.probe(next) {
      Probe::Outside => {
        if !outside {
          paths.terminate(boundary);
          outside = true;
        }
        edge_point = Some(boundary);
        dir = dir.rotate_cw();
      }
      Probe::Solid => {
        if outside {
          paths.begin(edge_point.take());
          outside = false;
        }
        paths.place(boundary, dir);
        dir = dir.rotate_cw();
      }
      Probe::Open => {
        cur = next;
        dir = dir.rotate_ccw();
        visited.push(cur);
      }
    }

    if closing {
      break;
    }
  }

  Walk {
    contours: paths.finish(diagnostic.is_some()),
    visited,
    diagnostic,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::BorderPolicy;
  use crate::contour::domain::{ChunkWindow, MapDomain};
  use crate::coords::CellRect;
  use crate::grid::OccupancyGrid;

  fn grid_from(rows: &[&str], border: BorderPolicy) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(rows[0].len() as u32, rows.len() as u32, border);
    for (y, row) in rows.iter().enumerate() {
      for (x, ch) in row.chars().enumerate() {
        grid.set_filled(CellPos::new(x as i32, y as i32), ch == '#');
      }
    }
    grid
  }

  #[test]
  fn single_open_cell_yields_closed_diamond() {
    let grid = grid_from(&["###", "#.#", "###"], BorderPolicy::Solid);
    let walk = walk_boundary(&MapDomain::new(&grid), CellPos::new(1, 1), 100);
    assert!(walk.diagnostic.is_none());
    assert_eq!(walk.contours.len(), 1);
    let contour = &walk.contours[0];
    assert!(contour.closed);
    assert_eq!(contour.points.len(), 5);
    assert_eq!(contour.points.first(), contour.points.last());
    assert_eq!(contour.points[0], Vec2::new(1.0, 0.5));
  }

  #[test]
  fn straight_runs_collapse_to_endpoints() {
    let grid = grid_from(&["######", "#....#", "######"], BorderPolicy::Solid);
    let walk = walk_boundary(&MapDomain::new(&grid), CellPos::new(1, 1), 1000);
    let contour = &walk.contours[0];
    assert!(contour.closed);
    // Each long wall keeps two points; the end caps add one each.
    assert!(contour.points.contains(&Vec2::new(1.0, 0.5)));
    assert!(contour.points.contains(&Vec2::new(4.0, 0.5)));
    assert!(!contour.points.contains(&Vec2::new(2.0, 0.5)));
    assert_eq!(walk.visited.iter().filter(|p| p.y == 1).count(), walk.visited.len());
  }

  #[test]
  fn no_solid_neighbour_is_reported() {
    let grid = grid_from(&["...", "...", "..."], BorderPolicy::Open);
    let walk = walk_boundary(&MapDomain::new(&grid), CellPos::new(1, 1), 100);
    assert!(walk.contours.is_empty());
    assert_eq!(
      walk.diagnostic,
      Some(TraceDiagnostic::NoSolidNeighbor {
        start: CellPos::new(1, 1)
      })
    );
  }

  #[test]
  fn tiny_cap_aborts_walk() {
    let grid = grid_from(&["######", "#....#", "######"], BorderPolicy::Solid);
    let walk = walk_boundary(&MapDomain::new(&grid), CellPos::new(1, 1), 3);
    assert!(walk.contours.is_empty());
    assert!(matches!(
      walk.diagnostic,
      Some(TraceDiagnostic::IterationCap { cap: 3, .. })
    ));
  }

  #[test]
  fn window_edge_clips_into_open_path() {
    // Corridor that runs off the right edge of the window.
    let grid = grid_from(
      &["########", "#.......", "########"],
      BorderPolicy::Solid,
    );
    let window = CellRect::new(CellPos::new(0, 0), CellPos::new(3, 2));
    let walk = walk_boundary(&ChunkWindow::new(&grid, window), CellPos::new(1, 1), 1000);
    assert!(walk.diagnostic.is_none());
    assert_eq!(walk.contours.len(), 1);
    let contour = &walk.contours[0];
    assert!(!contour.closed);
    // Both ends sit on the window edge.
    assert_eq!(contour.points.first().unwrap().x, 3.5);
    assert_eq!(contour.points.last().unwrap().x, 3.5);
  }
}
