//! Edit requests - masked rectangular fill/subtract operations.

use crate::coords::{CellPos, CellRect};
use crate::error::EditError;

/// Rectangular boolean mask selecting the cells an edit touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditMask {
  width: u32,
  height: u32,
  bits: Vec<bool>,
}

impl EditMask {
  /// Creates a mask with every cell selected.
  pub fn filled(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      bits: vec![true; width as usize * height as usize],
    }
  }

  /// Creates a mask with no cell selected.
  pub fn cleared(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      bits: vec![false; width as usize * height as usize],
    }
  }

  /// Builds a mask from rows (outer index = y).
  pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, EditError> {
    let width = rows.first().map_or(0, |row| row.as_ref().len());
    let mut bits = Vec::with_capacity(width * rows.len());
    for (row, cells) in rows.iter().enumerate() {
      let cells = cells.as_ref();
      if cells.len() != width {
        return Err(EditError::RaggedMask {
          row,
          expected: width,
          found: cells.len(),
        });
      }
      bits.extend_from_slice(cells);
    }
    Ok(Self {
      width: width as u32,
      height: rows.len() as u32,
      bits,
    })
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// True if either dimension is zero.
  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  /// Returns whether the mask selects `(x, y)`. False outside the mask.
  pub fn get(&self, x: u32, y: u32) -> bool {
    x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
  }

  /// Selects or deselects `(x, y)`. Ignored outside the mask.
  pub fn set(&mut self, x: u32, y: u32, selected: bool) {
    if x < self.width && y < self.height {
      self.bits[(y * self.width + x) as usize] = selected;
    }
  }

  /// Iterates the selected offsets in row-major order.
  pub fn selected(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    let width = self.width.max(1);
    self
      .bits
      .iter()
      .enumerate()
      .filter(|(_, selected)| **selected)
      .map(move |(i, _)| (i as u32 % width, i as u32 / width))
  }
}

/// Brush shapes used by interactive tools and the profiling benches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Brush {
  /// Single cell.
  Point,
  /// 3x3 plus sign.
  Cross,
  /// Full 3x3 square.
  Square3,
  /// 5x5 diamond.
  Diamond5,
  /// Full 5x5 square.
  Square5,
}

impl Brush {
  pub const ALL: [Brush; 5] = [
    Brush::Point,
    Brush::Cross,
    Brush::Square3,
    Brush::Diamond5,
    Brush::Square5,
  ];

  /// Builds the brush mask.
  pub fn mask(self) -> EditMask {
    match self {
      Brush::Point => EditMask::filled(1, 1),
      Brush::Square3 => EditMask::filled(3, 3),
      Brush::Square5 => EditMask::filled(5, 5),
      Brush::Cross => diamond(1),
      Brush::Diamond5 => diamond(2),
    }
  }
}

/// Manhattan-distance diamond of the given radius.
fn diamond(radius: u32) -> EditMask {
  let size = radius * 2 + 1;
  let mut mask = EditMask::cleared(size, size);
  for y in 0..size {
    for x in 0..size {
      mask.set(x, y, x.abs_diff(radius) + y.abs_diff(radius) <= radius);
    }
  }
  mask
}

/// A masked edit: where the mask is set, cells become filled, or empty when
/// `subtract` is true. Unselected cells are untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
  /// Grid position of mask cell `(0, 0)`.
  pub top_left: CellPos,
  pub mask: EditMask,
  pub subtract: bool,
}

impl EditRequest {
  pub fn new(top_left: CellPos, mask: EditMask, subtract: bool) -> Self {
    Self {
      top_left,
      mask,
      subtract,
    }
  }

  /// Request whose mask is centered on `center` (rounded toward the
  /// top-left for even sizes).
  pub fn centered(center: CellPos, mask: EditMask, subtract: bool) -> Self {
    let top_left = CellPos::new(
      center.x.saturating_sub_unsigned(mask.width() / 2),
      center.y.saturating_sub_unsigned(mask.height() / 2),
    );
    Self::new(top_left, mask, subtract)
  }

  /// Carves (empties) the cells selected by `mask`.
  pub fn carve(top_left: CellPos, mask: EditMask) -> Self {
    Self::new(top_left, mask, true)
  }

  /// Fills the cells selected by `mask`.
  pub fn fill(top_left: CellPos, mask: EditMask) -> Self {
    Self::new(top_left, mask, false)
  }

  /// Fill state written to each selected cell.
  pub fn target_filled(&self) -> bool {
    !self.subtract
  }

  /// Rectangle covered by the mask, or `None` for an empty mask.
  pub fn rect(&self) -> Option<CellRect> {
    CellRect::from_origin_size(self.top_left, self.mask.width(), self.mask.height())
  }

  /// Absolute positions of the selected cells (not clipped to any map).
  ///
  /// Cells whose position overflows `i32` are skipped.
  pub fn targets(&self) -> impl Iterator<Item = CellPos> + '_ {
    self.mask.selected().filter_map(move |(x, y)| {
      Some(CellPos::new(
        self.top_left.x.checked_add_unsigned(x)?,
        self.top_left.y.checked_add_unsigned(y)?,
      ))
    })
  }
}
