//! Coordinate types for the occupancy grid.
//!
//! Defines the coordinate system shared by every component:
//! - [`CellPos`]: integer cell position (x grows right, y grows down)
//! - [`Direction`]: the four walk directions in their fixed rotation order
//! - [`CellRect`]: inclusive cell rectangle used for edit and dirty areas
//! - [`MapTransform`]: translation between world space and cell space
//!
//! Contour points live in the same space as cells but at half-integer
//! offsets: cell centers are integers, boundaries sit on `.5`.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

use bevy::math::Vec2;

/// Integer position of a cell in the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellPos {
  pub x: i32,
  pub y: i32,
}

impl CellPos {
  /// Creates a new cell position.
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Returns the neighbouring cell in the given direction.
  #[inline]
  pub fn step(self, dir: Direction) -> Self {
    let (dx, dy) = dir.offset();
    Self::new(self.x + dx, self.y + dy)
  }

  /// Returns the four edge-sharing neighbours in rotation order.
  pub fn neighbors(self) -> [CellPos; 4] {
    Direction::ALL.map(|dir| self.step(dir))
  }

  /// Cell center as a point in contour space.
  pub fn center(self) -> Vec2 {
    Vec2::new(self.x as f32, self.y as f32)
  }
}

// Row-major ordering, so ordered sets of cells iterate top to bottom, left to
// right.
impl Ord for CellPos {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.y, self.x).cmp(&(other.y, other.x))
  }
}

impl PartialOrd for CellPos {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Add for CellPos {
  type Output = CellPos;

  fn add(self, rhs: CellPos) -> CellPos {
    CellPos::new(self.x + rhs.x, self.y + rhs.y)
  }
}

impl Sub for CellPos {
  type Output = CellPos;

  fn sub(self, rhs: CellPos) -> CellPos {
    CellPos::new(self.x - rhs.x, self.y - rhs.y)
  }
}

/// Cardinal walk direction.
///
/// The declaration order is the rotation order used by the boundary walk:
/// rotating clockwise moves to the next variant, counter-clockwise to the
/// previous one, wrapping at either end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
  Down,
  Right,
  Up,
  Left,
}

impl Direction {
  /// All directions in rotation order.
  pub const ALL: [Direction; 4] = [
    Direction::Down,
    Direction::Right,
    Direction::Up,
    Direction::Left,
  ];

  /// Returns the index (0-3) of this direction in rotation order.
  pub const fn index(self) -> usize {
    match self {
      Direction::Down => 0,
      Direction::Right => 1,
      Direction::Up => 2,
      Direction::Left => 3,
    }
  }

  /// Returns the direction at `index` modulo 4.
  pub const fn from_index(index: usize) -> Direction {
    Self::ALL[index % 4]
  }

  /// Next direction in rotation order.
  pub const fn rotate_cw(self) -> Direction {
    Self::from_index(self.index() + 1)
  }

  /// Previous direction in rotation order.
  pub const fn rotate_ccw(self) -> Direction {
    Self::from_index(self.index() + 3)
  }

  /// Unit cell offset `(dx, dy)`.
  pub const fn offset(self) -> (i32, i32) {
    match self {
      Direction::Down => (0, -1),
      Direction::Right => (1, 0),
      Direction::Up => (0, 1),
      Direction::Left => (-1, 0),
    }
  }

  /// Half of the unit offset, i.e. the distance from a cell center to the
  /// boundary it shares with its neighbour.
  pub fn half_step(self) -> Vec2 {
    let (dx, dy) = self.offset();
    Vec2::new(dx as f32 * 0.5, dy as f32 * 0.5)
  }
}

/// Inclusive rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
  pub min: CellPos,
  pub max: CellPos,
}

impl CellRect {
  /// Creates a rectangle from inclusive corners.
  pub const fn new(min: CellPos, max: CellPos) -> Self {
    Self { min, max }
  }

  /// Creates a rectangle from its top-left cell and size.
  ///
  /// Returns `None` for a zero-sized rectangle.
  pub fn from_origin_size(origin: CellPos, width: u32, height: u32) -> Option<Self> {
    if width == 0 || height == 0 {
      return None;
    }
    Some(Self::new(
      origin,
      CellPos::new(
        origin.x.saturating_add_unsigned(width - 1),
        origin.y.saturating_add_unsigned(height - 1),
      ),
    ))
  }

  /// Returns this rectangle grown by `by` cells on every side.
  pub fn expanded(&self, by: i32) -> Self {
    Self::new(
      CellPos::new(self.min.x.saturating_sub(by), self.min.y.saturating_sub(by)),
      CellPos::new(self.max.x.saturating_add(by), self.max.y.saturating_add(by)),
    )
  }

  /// Returns the overlap of two rectangles, or `None` if they don't overlap.
  pub fn intersection(&self, other: &CellRect) -> Option<CellRect> {
    let min = CellPos::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
    let max = CellPos::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
    (min.x <= max.x && min.y <= max.y).then_some(CellRect::new(min, max))
  }

  /// Returns true if the cell lies inside this rectangle.
  pub fn contains(&self, pos: CellPos) -> bool {
    pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
  }

  pub fn width(&self) -> u32 {
    (i64::from(self.max.x) - i64::from(self.min.x) + 1) as u32
  }

  pub fn height(&self) -> u32 {
    (i64::from(self.max.y) - i64::from(self.min.y) + 1) as u32
  }

  /// Number of cells covered.
  pub fn area(&self) -> usize {
    self.width() as usize * self.height() as usize
  }

  /// Iterates the covered cells in row-major order.
  pub fn cells(&self) -> impl Iterator<Item = CellPos> + use<> {
    let (min, max) = (self.min, self.max);
    (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| CellPos::new(x, y)))
  }
}

/// Translation between world space and cell space.
///
/// The map is centered on the world origin with cell `(0, 0)` at the top-left
/// corner; world Y points up while cell Y points down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTransform {
  top_left: Vec2,
  width: u32,
  height: u32,
}

impl MapTransform {
  /// Creates a transform for a `width × height` map centered on the origin.
  pub fn centered(width: u32, height: u32) -> Self {
    Self {
      top_left: Vec2::new(-(width as f32) / 2.0, height as f32 / 2.0),
      width,
      height,
    }
  }

  /// World position of cell `(0, 0)`.
  pub fn top_left(&self) -> Vec2 {
    self.top_left
  }

  /// Rounds a world point to the nearest cell and clamps it into the map.
  pub fn world_to_cell(&self, world: Vec2) -> CellPos {
    let local = world - self.top_left;
    // Clamp before the cast so far points can't saturate and overflow.
    let x = local.x.round_ties_even().clamp(0.0, self.width.saturating_sub(1) as f32);
    let y = (-local.y).round_ties_even().clamp(0.0, self.height.saturating_sub(1) as f32);
    CellPos::new(x as i32, y as i32)
  }

  /// Converts a contour-space point (cells, half-integer boundaries) to world
  /// space.
  pub fn cell_to_world(&self, point: Vec2) -> Vec2 {
    self.top_left + Vec2::new(point.x, -point.y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rotation_cycles_through_all_directions() {
    let mut dir = Direction::Down;
    let mut seen = Vec::new();
    for _ in 0..4 {
      seen.push(dir);
      dir = dir.rotate_cw();
    }
    assert_eq!(seen, Direction::ALL.to_vec());
    assert_eq!(dir, Direction::Down);
    assert_eq!(Direction::Down.rotate_ccw(), Direction::Left);
    assert_eq!(Direction::Left.rotate_cw(), Direction::Down);
  }

  #[test]
  fn cell_ordering_is_row_major() {
    let mut cells = vec![CellPos::new(3, 0), CellPos::new(0, 1), CellPos::new(1, 0)];
    cells.sort();
    assert_eq!(
      cells,
      vec![CellPos::new(1, 0), CellPos::new(3, 0), CellPos::new(0, 1)]
    );
  }

  #[test]
  fn rect_expand_and_intersect() {
    let rect = CellRect::from_origin_size(CellPos::new(0, 0), 3, 2).unwrap();
    assert_eq!(rect.max, CellPos::new(2, 1));
    let grown = rect.expanded(1);
    assert_eq!(grown.min, CellPos::new(-1, -1));
    assert_eq!(grown.area(), 5 * 4);

    let map = CellRect::new(CellPos::new(0, 0), CellPos::new(9, 9));
    assert_eq!(grown.intersection(&map).unwrap().min, CellPos::new(0, 0));

    let far = CellRect::new(CellPos::new(20, 20), CellPos::new(21, 21));
    assert!(far.intersection(&map).is_none());
    assert!(CellRect::from_origin_size(CellPos::new(0, 0), 0, 4).is_none());
  }

  #[test]
  fn world_to_cell_clamps_far_points() {
    let transform = MapTransform::centered(10, 8);
    assert_eq!(
      transform.world_to_cell(Vec2::new(-1000.0, 1000.0)),
      CellPos::new(0, 0)
    );
    assert_eq!(
      transform.world_to_cell(Vec2::new(1000.0, -1000.0)),
      CellPos::new(9, 7)
    );
    assert_eq!(
      transform.world_to_cell(Vec2::new(1.0e12, -1.0e12)),
      CellPos::new(9, 7)
    );
    assert_eq!(
      transform.world_to_cell(Vec2::new(-1.0e12, 1.0e12)),
      CellPos::new(0, 0)
    );
  }

  #[test]
  fn rects_saturate_at_integer_limits() {
    let edge = CellPos::new(i32::MAX - 1, i32::MIN);
    let rect = CellRect::from_origin_size(edge, 4, 3).unwrap();
    assert_eq!(rect.max, CellPos::new(i32::MAX, i32::MIN + 2));
    let grown = rect.expanded(1);
    assert_eq!(grown.min, CellPos::new(i32::MAX - 2, i32::MIN));
    assert_eq!(grown.max, CellPos::new(i32::MAX, i32::MIN + 3));
    assert_eq!(grown.width(), 3);
    assert!(grown.intersection(&CellRect::new(CellPos::new(0, 0), CellPos::new(9, 9))).is_none());
  }

  #[test]
  fn world_and_cell_space_round_trip_on_centers() {
    let transform = MapTransform::centered(10, 8);
    let cell = CellPos::new(4, 3);
    let world = transform.cell_to_world(cell.center());
    assert_eq!(world, Vec2::new(-1.0, 1.0));
    assert_eq!(transform.world_to_cell(world), cell);
  }
}
