use crate::Grid;

/// A (row, col) coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

/// Rendering state of a cell. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
    /// Discovered but not yet expanded (open set)
    Frontier,
    /// Fully expanded (closed set)
    Visited,
    Path,
}

impl CellState {
    pub const ALL: [CellState; 7] = [
        CellState::Empty,
        CellState::Start,
        CellState::End,
        CellState::Barrier,
        CellState::Frontier,
        CellState::Visited,
        CellState::Path,
    ];

    /// Glyph used by the text layout format
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Barrier => '#',
            CellState::Frontier => 'o',
            CellState::Visited => 'x',
            CellState::Path => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        CellState::ALL.into_iter().find(|s| s.glyph() == glyph)
    }

    /// Frontier, Visited and Path are left behind by a search run
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Frontier | CellState::Visited | CellState::Path)
    }
}

/// A single grid cell: identity, pixel geometry, state and cached neighbors
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// Pixel width of one cell
    pub width: u32,
    pub total_rows: usize,
    state: CellState,
    neighbors: Vec<CellPos>,
}

impl Cell {
    pub fn new(row: usize, col: usize, width: u32, total_rows: usize) -> Self {
        debug_assert!(row < total_rows && col < total_rows);
        Cell {
            row,
            col,
            width,
            total_rows,
            state: CellState::Empty,
            neighbors: Vec::with_capacity(4),
        }
    }

    pub fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }

    /// Pixel origin of the cell. Rows run along the horizontal axis.
    pub fn origin(&self) -> (u32, u32) {
        (self.row as u32 * self.width, self.col as u32 * self.width)
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }

    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    pub fn is_open(&self) -> bool {
        self.state == CellState::Frontier
    }

    pub fn is_closed(&self) -> bool {
        self.state == CellState::Visited
    }

    pub fn is_path(&self) -> bool {
        self.state == CellState::Path
    }

    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }

    pub fn make_start(&mut self) {
        self.state = CellState::Start;
    }

    pub fn make_end(&mut self) {
        self.state = CellState::End;
    }

    pub fn make_barrier(&mut self) {
        self.state = CellState::Barrier;
    }

    pub fn make_open(&mut self) {
        self.state = CellState::Frontier;
    }

    pub fn make_closed(&mut self) {
        self.state = CellState::Visited;
    }

    pub fn make_path(&mut self) {
        self.state = CellState::Path;
    }

    /// Cached neighbors, valid as of the last `update_neighbors` call
    pub fn neighbors(&self) -> &[CellPos] {
        &self.neighbors
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<CellPos>) {
        self.neighbors = neighbors;
    }

    /// Recompute the neighbor cache against `grid`
    pub fn update_neighbors(&mut self, grid: &Grid) {
        self.neighbors = self.neighbors_in(grid);
    }

    /// Walkable 4-neighbors in priority order: down, up, right, left
    pub fn neighbors_in(&self, grid: &Grid) -> Vec<CellPos> {
        let (row, col) = (self.row, self.col);
        let mut candidates = Vec::with_capacity(4);

        if row + 1 < self.total_rows {
            candidates.push(CellPos::new(row + 1, col)); // DOWN
        }
        if row > 0 {
            candidates.push(CellPos::new(row - 1, col)); // UP
        }
        if col + 1 < self.total_rows {
            candidates.push(CellPos::new(row, col + 1)); // RIGHT
        }
        if col > 0 {
            candidates.push(CellPos::new(row, col - 1)); // LEFT
        }

        candidates
            .into_iter()
            .filter(|&pos| grid.get(pos).is_some_and(|cell| !cell.is_barrier()))
            .collect()
    }
}
