#![allow(dead_code)]

use pathviz::{CellPos, CellState, Grid, Layout};
use std::collections::{HashMap, VecDeque};

pub const CELL_PX: u32 = 10;

/// Build a grid with fresh neighbors from a text layout
pub fn grid_from(text: &str) -> (Grid, CellPos, CellPos) {
    let layout = Layout::parse(text).expect("fixture layout should parse");
    let mut grid = layout
        .to_grid(layout.rows as u32 * CELL_PX)
        .expect("fixture grid should build");
    grid.refresh_all_neighbors();
    let start = layout.start.expect("fixture needs a start");
    let end = layout.end.expect("fixture needs an end");
    (grid, start, end)
}

/// Shortest path length by breadth-first search, ignoring cached neighbors
pub fn bfs_distance(grid: &Grid, start: CellPos, end: CellPos) -> Option<usize> {
    let rows = grid.rows() as isize;
    let mut dist = HashMap::from([(start, 0usize)]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        if pos == end {
            return dist.get(&pos).copied();
        }
        for (dr, dc) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (r, c) = (pos.row as isize + dr, pos.col as isize + dc);
            if r < 0 || c < 0 || r >= rows || c >= rows {
                continue;
            }
            let next = CellPos::new(r as usize, c as usize);
            if grid.state(next) == CellState::Barrier || dist.contains_key(&next) {
                continue;
            }
            dist.insert(next, dist[&pos] + 1);
            queue.push_back(next);
        }
    }
    None
}

/// Small xorshift generator so random grids are reproducible without extra crates
pub struct XorShift(pub u64);

impl XorShift {
    pub fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

/// Random barrier layout with distinct start and end
pub fn random_grid(rng: &mut XorShift, rows: usize, barrier_percent: u64) -> (Grid, CellPos, CellPos) {
    let mut grid = Grid::new(rows, rows as u32 * CELL_PX).unwrap();
    let pick = |rng: &mut XorShift| {
        CellPos::new(rng.below(rows as u64) as usize, rng.below(rows as u64) as usize)
    };
    let start = pick(rng);
    let mut end = pick(rng);
    while end == start {
        end = pick(rng);
    }

    for row in 0..rows {
        for col in 0..rows {
            let pos = CellPos::new(row, col);
            if pos != start && pos != end && rng.below(100) < barrier_percent {
                grid.set_state(pos, CellState::Barrier);
            }
        }
    }
    grid.set_state(start, CellState::Start);
    grid.set_state(end, CellState::End);
    grid.refresh_all_neighbors();
    (grid, start, end)
}

/// Path cells must form a connected chain of unit steps
pub fn assert_contiguous(path: &[CellPos]) {
    for pair in path.windows(2) {
        let step = pair[0].row.abs_diff(pair[1].row) + pair[0].col.abs_diff(pair[1].col);
        assert_eq!(step, 1, "path jumps from {:?} to {:?}", pair[0], pair[1]);
    }
}
