use crate::cell::{Cell, CellPos, CellState};
use crate::error::GridError;
use log::debug;

/// Square grid of cells, `rows x rows`, drawn into a `width_px` square
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    width_px: u32,
    cell_width: u32,
    cells: Vec<Cell>,
    /// Set when a barrier is placed or removed since the last neighbor refresh
    neighbors_stale: bool,
    /// Revision number - incremented whenever a cell state changes
    revision: u64,
}

impl Grid {
    /// Create a new grid with all cells Empty
    pub fn new(rows: usize, width_px: u32) -> Result<Self, GridError> {
        if rows == 0 {
            return Err(GridError::NoRows);
        }
        let cell_width = width_px / rows as u32;
        if cell_width == 0 {
            return Err(GridError::TooNarrow { rows, width_px });
        }

        Ok(Grid {
            rows,
            width_px,
            cell_width,
            cells: Self::make_cells(rows, cell_width),
            neighbors_stale: true,
            revision: 0,
        })
    }

    fn make_cells(rows: usize, cell_width: u32) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(rows * rows);
        for row in 0..rows {
            for col in 0..rows {
                cells.push(Cell::new(row, col, cell_width, rows));
            }
        }
        cells
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Pixel width of one cell (`width_px / rows`, integer division)
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.rows
    }

    fn index(&self, pos: CellPos) -> usize {
        pos.row * self.rows + pos.col
    }

    pub fn get(&self, pos: CellPos) -> Option<&Cell> {
        if self.contains(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    /// Cell at `pos`. Panics if `pos` is outside the grid.
    pub fn cell(&self, pos: CellPos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn state(&self, pos: CellPos) -> CellState {
        self.cell(pos).state()
    }

    /// Set a cell's state, tracking barrier changes for the neighbor cache.
    /// Out-of-bounds positions are ignored.
    pub fn set_state(&mut self, pos: CellPos, state: CellState) {
        if !self.contains(pos) {
            return;
        }
        let idx = self.index(pos);
        let old = self.cells[idx].state();
        if old == state {
            return;
        }
        if old == CellState::Barrier || state == CellState::Barrier {
            self.neighbors_stale = true;
        }
        self.cells[idx].set_state(state);
        self.revision += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    pub fn positions_in(&self, state: CellState) -> Vec<CellPos> {
        self.cells
            .iter()
            .filter(|c| c.state() == state)
            .map(Cell::pos)
            .collect()
    }

    /// Map a pixel coordinate to the cell under it.
    /// Rows run along x, columns along y.
    pub fn cell_at_pixel(&self, x: f32, y: f32) -> Option<CellPos> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let row = x as u32 / self.cell_width;
        let col = y as u32 / self.cell_width;
        let pos = CellPos::new(row as usize, col as usize);
        self.contains(pos).then_some(pos)
    }

    pub fn neighbors(&self, pos: CellPos) -> &[CellPos] {
        self.cell(pos).neighbors()
    }

    pub fn neighbors_stale(&self) -> bool {
        self.neighbors_stale
    }

    /// Rebuild the neighbor cache of every cell
    pub fn refresh_all_neighbors(&mut self) {
        let lists: Vec<Vec<CellPos>> = self.cells.iter().map(|c| c.neighbors_in(self)).collect();
        for (cell, neighbors) in self.cells.iter_mut().zip(lists) {
            cell.set_neighbors(neighbors);
        }
        self.neighbors_stale = false;
    }

    /// Discard every cell and rebuild an all-Empty grid of the same size
    pub fn reset(&mut self) {
        self.cells = Self::make_cells(self.rows, self.cell_width);
        self.neighbors_stale = true;
        self.revision += 1;
        debug!("grid reset ({}x{})", self.rows, self.rows);
    }

    /// Turn Frontier, Visited and Path cells back into Empty
    pub fn clear_search_marks(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| c.state().is_search_mark()) {
            cell.reset();
            cleared += 1;
        }
        if cleared > 0 {
            self.revision += 1;
        }
        cleared
    }
}
