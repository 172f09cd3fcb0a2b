//! Plain-text grid layouts.
//!
//! One line per column, one glyph per row, so the text reads the same way the
//! grid is drawn on screen (rows run left to right):
//!
//! ```text
//! S..
//! .#.
//! ..E
//! ```
//!
//! Glyphs are those of [`CellState::glyph`]. Search marks (`o`, `x`, `*`) are
//! accepted when parsing and read back as empty cells.

use crate::cell::{CellPos, CellState};
use crate::error::{GridError, LayoutError};
use crate::Grid;

/// Start, end and barrier placement on a square grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub rows: usize,
    pub start: Option<CellPos>,
    pub end: Option<CellPos>,
    pub barriers: Vec<CellPos>,
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(LayoutError::Empty);
        }

        let rows = lines.len();
        let mut layout = Layout {
            rows,
            start: None,
            end: None,
            barriers: Vec::new(),
        };

        for (col, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != rows {
                return Err(LayoutError::NotSquare {
                    line: col + 1,
                    found,
                    expected: rows,
                });
            }

            for (row, glyph) in line.chars().enumerate() {
                let pos = CellPos::new(row, col);
                let state = CellState::from_glyph(glyph)
                    .ok_or(LayoutError::UnknownGlyph { glyph, line: col + 1 })?;
                match state {
                    CellState::Start => {
                        if layout.start.replace(pos).is_some() {
                            return Err(LayoutError::Duplicate(glyph));
                        }
                    }
                    CellState::End => {
                        if layout.end.replace(pos).is_some() {
                            return Err(LayoutError::Duplicate(glyph));
                        }
                    }
                    CellState::Barrier => layout.barriers.push(pos),
                    _ => {}
                }
            }
        }

        layout.barriers.sort();
        Ok(layout)
    }

    /// Capture start, end and barriers from a grid, dropping search marks
    pub fn from_grid(grid: &Grid) -> Self {
        let single = |state| grid.positions_in(state).first().copied();
        Layout {
            rows: grid.rows(),
            start: single(CellState::Start),
            end: single(CellState::End),
            barriers: grid.positions_in(CellState::Barrier),
        }
    }

    /// Build a grid of this layout drawn into `width_px`
    pub fn to_grid(&self, width_px: u32) -> Result<Grid, GridError> {
        let mut grid = Grid::new(self.rows, width_px)?;
        for &pos in &self.barriers {
            grid.set_state(pos, CellState::Barrier);
        }
        if let Some(start) = self.start {
            grid.set_state(start, CellState::Start);
        }
        if let Some(end) = self.end {
            grid.set_state(end, CellState::End);
        }
        Ok(grid)
    }
}

/// Render every cell of `grid`, search marks included
pub fn render(grid: &Grid) -> String {
    let rows = grid.rows();
    let mut text = String::with_capacity(rows * (rows + 1));
    for col in 0..rows {
        for row in 0..rows {
            text.push(grid.state(CellPos::new(row, col)).glyph());
        }
        text.push('\n');
    }
    text
}
