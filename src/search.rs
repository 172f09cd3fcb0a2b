//! Best-first (A*) search over a grid's cached neighbor graph.
//!
//! A run is an explicit value, [`SearchRun`], that performs one unit of work
//! per [`SearchRun::step`] call. [`run`] drives it to completion synchronously,
//! notifying a [`StepObserver`] after every expansion and every path tag.

use crate::cell::{CellPos, CellState};
use crate::error::SearchError;
use crate::Grid;
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Manhattan distance, the heuristic for 4-directional unit-cost movement
pub fn manhattan(a: CellPos, b: CellPos) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}

/// Open-set entry ordered by f-score, then by insertion order.
/// The cell itself never takes part in the comparison.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: u32,
    order: u64,
    pos: CellPos,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.order == other.order
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Terminal result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `path` runs from start to end, both included
    Found { path: Vec<CellPos>, expanded: usize },
    /// The open set emptied before reaching the end
    NoPath { expanded: usize },
    Cancelled { expanded: usize },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// Number of edges on the found path
    pub fn path_len(&self) -> Option<usize> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path.len() - 1),
            _ => None,
        }
    }

    pub fn expanded(&self) -> usize {
        match *self {
            SearchOutcome::Found { expanded, .. }
            | SearchOutcome::NoPath { expanded }
            | SearchOutcome::Cancelled { expanded } => expanded,
        }
    }
}

/// What a single call to [`SearchRun::step`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    /// A cell was dequeued and its neighbors relaxed
    Expanded(CellPos),
    /// A cell on the reconstructed path was tagged
    Traced(CellPos),
    Finished(SearchOutcome),
}

/// Receives a notification after each unit of visible progress
pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid);

    /// Polled once before each dequeue
    fn cancel_requested(&mut self) -> bool {
        false
    }
}

impl StepObserver for () {
    fn on_step(&mut self, _grid: &Grid) {}
}

#[derive(Debug)]
enum RunPhase {
    Searching,
    /// Walking `came_from` back from the end; `path` is in reverse
    Tracing { cursor: CellPos, path: Vec<CellPos> },
    Done(SearchOutcome),
}

/// Bookkeeping for one search run. Dropped when the run ends.
#[derive(Debug)]
pub struct SearchRun {
    start: CellPos,
    end: CellPos,
    open: BinaryHeap<OpenEntry>,
    open_members: HashSet<CellPos>,
    came_from: HashMap<CellPos, CellPos>,
    g_score: HashMap<CellPos, u32>,
    f_score: HashMap<CellPos, u32>,
    counter: u64,
    /// Expanded on the previous step, tagged Visited before the next dequeue
    pending_close: Option<CellPos>,
    expanded: usize,
    phase: RunPhase,
}

impl SearchRun {
    /// Start a run. The grid's neighbor cache must be fresh.
    pub fn new(grid: &Grid, start: CellPos, end: CellPos) -> Result<Self, SearchError> {
        for pos in [start, end] {
            if !grid.contains(pos) {
                return Err(SearchError::OutOfBounds(pos));
            }
        }
        if start == end {
            return Err(SearchError::SameEndpoints(start));
        }
        if grid.neighbors_stale() {
            return Err(SearchError::StaleNeighbors);
        }

        let h = manhattan(start, end);
        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            f_score: h,
            order: 0,
            pos: start,
        });

        debug!(
            "search start ({},{}) -> ({},{}), h={}",
            start.row, start.col, end.row, end.col, h
        );

        Ok(SearchRun {
            start,
            end,
            open,
            open_members: HashSet::from([start]),
            came_from: HashMap::new(),
            g_score: HashMap::from([(start, 0)]),
            f_score: HashMap::from([(start, h)]),
            counter: 0,
            pending_close: None,
            expanded: 0,
            phase: RunPhase::Searching,
        })
    }

    pub fn start(&self) -> CellPos {
        self.start
    }

    pub fn end(&self) -> CellPos {
        self.end
    }

    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match &self.phase {
            RunPhase::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RunPhase::Done(_))
    }

    /// True when the next step will dequeue from the open set
    pub fn awaiting_dequeue(&self) -> bool {
        matches!(self.phase, RunPhase::Searching)
    }

    /// Best known distance from start, `None` for unreached cells
    pub fn g_score(&self, pos: CellPos) -> Option<u32> {
        self.g_score.get(&pos).copied()
    }

    pub fn f_score(&self, pos: CellPos) -> Option<u32> {
        self.f_score.get(&pos).copied()
    }

    /// Perform one unit of work
    pub fn step(&mut self, grid: &mut Grid) -> SearchStep {
        match self.phase {
            RunPhase::Done(ref outcome) => SearchStep::Finished(outcome.clone()),
            RunPhase::Tracing { .. } => self.trace_step(grid),
            RunPhase::Searching => self.expand_step(grid),
        }
    }

    /// Abort the run, leaving the grid in its partial coloring
    pub fn cancel(&mut self, grid: &mut Grid) -> SearchOutcome {
        if let Some(outcome) = self.outcome() {
            return outcome.clone();
        }
        self.close_pending(grid);
        debug!("search cancelled after {} expansions", self.expanded);
        self.finish(SearchOutcome::Cancelled {
            expanded: self.expanded,
        })
    }

    /// Run to completion, notifying `observer` after every step
    pub fn drive<O: StepObserver + ?Sized>(&mut self, grid: &mut Grid, observer: &mut O) -> SearchOutcome {
        loop {
            if let Some(outcome) = self.advance(grid, usize::MAX, observer) {
                return outcome;
            }
        }
    }

    /// Run at most `max_steps` steps. Returns the outcome once the run ends.
    pub fn advance<O: StepObserver + ?Sized>(
        &mut self,
        grid: &mut Grid,
        max_steps: usize,
        observer: &mut O,
    ) -> Option<SearchOutcome> {
        for _ in 0..max_steps {
            if self.awaiting_dequeue() && observer.cancel_requested() {
                return Some(self.cancel(grid));
            }
            match self.step(grid) {
                SearchStep::Expanded(_) | SearchStep::Traced(_) => observer.on_step(grid),
                SearchStep::Finished(outcome) => return Some(outcome),
            }
        }
        None
    }

    fn close_pending(&mut self, grid: &mut Grid) {
        if let Some(pos) = self.pending_close.take() {
            grid.set_state(pos, CellState::Visited);
        }
    }

    fn expand_step(&mut self, grid: &mut Grid) -> SearchStep {
        self.close_pending(grid);

        let Some(entry) = self.open.pop() else {
            debug!("search exhausted after {} expansions, no path", self.expanded);
            return SearchStep::Finished(self.finish(SearchOutcome::NoPath {
                expanded: self.expanded,
            }));
        };
        let current = entry.pos;
        self.open_members.remove(&current);

        if current == self.end {
            self.phase = RunPhase::Tracing {
                cursor: current,
                path: vec![current],
            };
            return self.trace_step(grid);
        }

        self.expanded += 1;
        let current_g = self.g_score.get(&current).copied().unwrap_or(u32::MAX);
        trace!(
            "expand ({},{}) g={} f={}",
            current.row,
            current.col,
            current_g,
            entry.f_score
        );

        for &neighbor in grid.neighbors(current).to_vec().iter() {
            let tentative_g = current_g + 1;
            let known_g = self.g_score.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g >= known_g {
                continue;
            }

            let f = tentative_g + manhattan(neighbor, self.end);
            self.came_from.insert(neighbor, current);
            self.g_score.insert(neighbor, tentative_g);
            self.f_score.insert(neighbor, f);

            if self.open_members.insert(neighbor) {
                self.counter += 1;
                self.open.push(OpenEntry {
                    f_score: f,
                    order: self.counter,
                    pos: neighbor,
                });
                grid.set_state(neighbor, CellState::Frontier);
            }
        }

        if current != self.start {
            self.pending_close = Some(current);
        }
        SearchStep::Expanded(current)
    }

    fn trace_step(&mut self, grid: &mut Grid) -> SearchStep {
        let RunPhase::Tracing { cursor, ref mut path } = self.phase else {
            return self.step(grid);
        };

        match self.came_from.get(&cursor).copied() {
            Some(prev) if prev != self.start => {
                grid.set_state(prev, CellState::Path);
                path.push(prev);
                self.phase = RunPhase::Tracing {
                    cursor: prev,
                    path: std::mem::take(path),
                };
                SearchStep::Traced(prev)
            }
            _ => {
                let mut path = std::mem::take(path);
                path.push(self.start);
                path.reverse();
                grid.set_state(self.start, CellState::Start);
                grid.set_state(self.end, CellState::End);
                debug!(
                    "search found path of {} edges after {} expansions",
                    path.len() - 1,
                    self.expanded
                );
                SearchStep::Finished(self.finish(SearchOutcome::Found {
                    path,
                    expanded: self.expanded,
                }))
            }
        }
    }

    fn finish(&mut self, outcome: SearchOutcome) -> SearchOutcome {
        self.open.clear();
        self.open_members.clear();
        self.came_from.clear();
        self.phase = RunPhase::Done(outcome.clone());
        outcome
    }
}

/// Run a search to completion on `grid`
pub fn run<O: StepObserver + ?Sized>(
    grid: &mut Grid,
    start: CellPos,
    end: CellPos,
    observer: &mut O,
) -> Result<SearchOutcome, SearchError> {
    let mut search = SearchRun::new(grid, start, end)?;
    Ok(search.drive(grid, observer))
}
