//! Interaction state machine.
//!
//! Maps pointer and keyboard events onto grid edits and search runs. The
//! controller owns the grid; while a run is in flight it ignores every input
//! that would mutate the grid except reset, cancel and quit.

use crate::action_log::{Action, ActionLog};
use crate::cell::{CellPos, CellState};
use crate::error::GridError;
use crate::layout::{self, Layout};
use crate::search::{SearchOutcome, SearchRun, StepObserver};
use crate::Grid;
use log::{debug, info, warn};

/// Interaction phase, derived from the start/end references and the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoStart,
    HasStart,
    HasStartEnd,
    Running,
}

/// Logical keys the controller understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Run,
    Reset,
    Cancel,
    ClearSearch,
    CopyLayout,
    PasteLayout,
    Other,
}

/// One input sample. Button events are level-triggered: the front end emits
/// them on every frame the button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    PrimaryDown,
    SecondaryDown,
    KeyDown(Key),
    PointerMoved { x: f32, y: f32 },
}

/// What the front end should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
    /// Put this text on the clipboard
    CopyLayout(String),
    /// Read a layout from the clipboard and pass it to `load_layout`
    PasteRequested,
}

pub struct Controller {
    grid: Grid,
    start: Option<CellPos>,
    end: Option<CellPos>,
    search: Option<SearchRun>,
    pointer: Option<(f32, f32)>,
    last_outcome: Option<SearchOutcome>,
    clear_before_run: bool,
    action_log: Option<ActionLog>,
}

impl Controller {
    pub fn new(grid: Grid) -> Self {
        Controller {
            grid,
            start: None,
            end: None,
            search: None,
            pointer: None,
            last_outcome: None,
            clear_before_run: true,
            action_log: None,
        }
    }

    /// Wipe Frontier/Visited/Path marks of the previous run before a new one
    pub fn with_clear_before_run(mut self, clear: bool) -> Self {
        self.clear_before_run = clear;
        self
    }

    pub fn with_action_log(mut self, log: ActionLog) -> Self {
        self.action_log = Some(log);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<CellPos> {
        self.start
    }

    pub fn end(&self) -> Option<CellPos> {
        self.end
    }

    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn action_log(&self) -> Option<&ActionLog> {
        self.action_log.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.search.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.search.is_some(), self.start, self.end) {
            (true, _, _) => Phase::Running,
            (false, None, _) => Phase::NoStart,
            (false, Some(_), None) => Phase::HasStart,
            (false, Some(_), Some(_)) => Phase::HasStartEnd,
        }
    }

    /// Cell under the last known pointer position
    pub fn pointer_cell(&self) -> Option<CellPos> {
        let (x, y) = self.pointer?;
        self.grid.cell_at_pixel(x, y)
    }

    fn record(&mut self, action: Action) {
        if let Some(log) = self.action_log.as_mut() {
            log.log(action);
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::Quit => {
                self.cancel_run();
                return Response::Quit;
            }
            InputEvent::PointerMoved { x, y } => self.pointer = Some((x, y)),
            InputEvent::PrimaryDown => self.primary_click(),
            InputEvent::SecondaryDown => self.erase(),
            InputEvent::KeyDown(key) => return self.key_down(key),
        }
        Response::Continue
    }

    fn key_down(&mut self, key: Key) -> Response {
        match key {
            Key::Run => {
                self.begin_run();
            }
            Key::Reset => self.reset(),
            Key::Cancel => {
                self.cancel_run();
            }
            Key::ClearSearch => {
                if !self.is_running() && self.grid.clear_search_marks() > 0 {
                    self.record(Action::ClearSearch);
                }
            }
            Key::CopyLayout => return Response::CopyLayout(layout::render(&self.grid)),
            Key::PasteLayout => {
                if !self.is_running() {
                    return Response::PasteRequested;
                }
            }
            Key::Other => {}
        }
        Response::Continue
    }

    fn primary_click(&mut self) {
        let Some(pos) = self.pointer_cell() else {
            return;
        };
        let state = self.grid.state(pos);

        match self.phase() {
            Phase::NoStart => {
                if state != CellState::Barrier && Some(pos) != self.end {
                    self.grid.set_state(pos, CellState::Start);
                    self.start = Some(pos);
                    debug!("start placed at ({},{})", pos.row, pos.col);
                    self.record(Action::PlaceStart { row: pos.row, col: pos.col });
                }
            }
            Phase::HasStart => {
                if Some(pos) != self.start {
                    self.grid.set_state(pos, CellState::End);
                    self.end = Some(pos);
                    debug!("end placed at ({},{})", pos.row, pos.col);
                    self.record(Action::PlaceEnd { row: pos.row, col: pos.col });
                }
            }
            Phase::HasStartEnd => {
                if Some(pos) != self.start && Some(pos) != self.end && state != CellState::Barrier {
                    self.grid.set_state(pos, CellState::Barrier);
                    self.record(Action::PlaceBarrier { row: pos.row, col: pos.col });
                }
            }
            Phase::Running => {}
        }
    }

    fn erase(&mut self) {
        if self.is_running() {
            return;
        }
        let Some(pos) = self.pointer_cell() else {
            return;
        };
        if self.grid.state(pos) == CellState::Empty {
            return;
        }

        self.grid.set_state(pos, CellState::Empty);
        if self.start == Some(pos) {
            self.start = None;
        } else if self.end == Some(pos) {
            self.end = None;
        }
        self.record(Action::Erase { row: pos.row, col: pos.col });
    }

    /// Refresh neighbors and start a run. Only legal once start and end are set.
    pub fn begin_run(&mut self) -> bool {
        if self.phase() != Phase::HasStartEnd {
            return false;
        }
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return false;
        };

        if self.clear_before_run {
            self.grid.clear_search_marks();
        }
        self.grid.refresh_all_neighbors();

        match SearchRun::new(&self.grid, start, end) {
            Ok(search) => {
                info!(
                    "running search ({},{}) -> ({},{})",
                    start.row, start.col, end.row, end.col
                );
                self.search = Some(search);
                self.last_outcome = None;
                self.record(Action::RunStarted);
                true
            }
            Err(e) => {
                warn!("search not started: {}", e);
                false
            }
        }
    }

    /// Drive the in-flight run by at most `max_steps` steps
    pub fn advance<O: StepObserver + ?Sized>(
        &mut self,
        max_steps: usize,
        observer: &mut O,
    ) -> Option<SearchOutcome> {
        let search = self.search.as_mut()?;
        let outcome = search.advance(&mut self.grid, max_steps, observer)?;
        self.finish_run(outcome.clone());
        Some(outcome)
    }

    /// Trigger a run and drive it to completion before returning
    pub fn run_blocking<O: StepObserver + ?Sized>(&mut self, observer: &mut O) -> Option<SearchOutcome> {
        if !self.begin_run() {
            return None;
        }
        self.advance(usize::MAX, observer)
    }

    /// Abort the in-flight run, if any
    pub fn cancel_run(&mut self) -> Option<SearchOutcome> {
        let mut search = self.search.take()?;
        let outcome = search.cancel(&mut self.grid);
        self.finish_run(outcome.clone());
        Some(outcome)
    }

    fn finish_run(&mut self, outcome: SearchOutcome) {
        self.search = None;

        // A cancelled run can leave the end tagged as frontier
        if let Some(start) = self.start {
            self.grid.set_state(start, CellState::Start);
        }
        if let Some(end) = self.end {
            self.grid.set_state(end, CellState::End);
        }

        let result = match &outcome {
            SearchOutcome::Found { .. } => "found",
            SearchOutcome::NoPath { .. } => "no_path",
            SearchOutcome::Cancelled { .. } => "cancelled",
        };
        info!(
            "search {}: path_len={:?} expanded={}",
            result,
            outcome.path_len(),
            outcome.expanded()
        );
        self.record(Action::RunFinished {
            result: result.to_string(),
            path_len: outcome.path_len(),
            expanded: outcome.expanded(),
        });
        self.last_outcome = Some(outcome);
    }

    /// Discard the grid and clear start/end. Cancels an in-flight run first.
    pub fn reset(&mut self) {
        self.cancel_run();
        self.grid.reset();
        self.start = None;
        self.end = None;
        self.last_outcome = None;
        self.record(Action::Reset);
    }

    /// Replace the grid with `layout`, keeping the pixel width.
    /// Returns `Ok(false)` while a run is in flight.
    pub fn load_layout(&mut self, layout: &Layout) -> Result<bool, GridError> {
        if self.is_running() {
            return Ok(false);
        }
        self.grid = layout.to_grid(self.grid.width_px())?;
        self.start = layout.start;
        self.end = layout.end;
        self.last_outcome = None;
        self.record(Action::LoadLayout { rows: layout.rows });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f32 = 10.0;

    fn controller(rows: usize) -> Controller {
        Controller::new(Grid::new(rows, rows as u32 * CELL as u32).unwrap())
    }

    fn click(c: &mut Controller, row: usize, col: usize, event: InputEvent) {
        c.handle(InputEvent::PointerMoved {
            x: row as f32 * CELL + 1.0,
            y: col as f32 * CELL + 1.0,
        });
        c.handle(event);
    }

    #[test]
    fn clicks_place_start_end_then_barriers() {
        let mut c = controller(5);
        assert_eq!(c.phase(), Phase::NoStart);

        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::HasStart);
        // Holding the button on the start cell does nothing
        c.handle(InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::HasStart);

        click(&mut c, 4, 4, InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::HasStartEnd);

        click(&mut c, 2, 2, InputEvent::PrimaryDown);
        click(&mut c, 4, 4, InputEvent::PrimaryDown);
        assert_eq!(c.grid().state(CellPos::new(2, 2)), CellState::Barrier);
        assert_eq!(c.grid().state(CellPos::new(4, 4)), CellState::End);
        assert_eq!(c.grid().count(CellState::Barrier), 1);
    }

    #[test]
    fn erase_walks_phases_back() {
        let mut c = controller(5);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 1, 1, InputEvent::PrimaryDown);

        click(&mut c, 1, 1, InputEvent::SecondaryDown);
        assert_eq!(c.phase(), Phase::HasStart);
        assert_eq!(c.end(), None);

        click(&mut c, 1, 1, InputEvent::PrimaryDown);
        click(&mut c, 0, 0, InputEvent::SecondaryDown);
        assert_eq!(c.phase(), Phase::NoStart);
        assert_eq!(c.end(), Some(CellPos::new(1, 1)));

        // The end cell cannot become the start
        click(&mut c, 1, 1, InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::NoStart);
        click(&mut c, 3, 3, InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::HasStartEnd);
    }

    #[test]
    fn start_is_not_placed_on_a_barrier() {
        let layout = Layout::parse("S#.\n...\n..E\n").unwrap();
        let mut c = controller(3);
        c.load_layout(&layout).unwrap();
        click(&mut c, 0, 0, InputEvent::SecondaryDown);
        click(&mut c, 1, 0, InputEvent::PrimaryDown);
        assert_eq!(c.phase(), Phase::NoStart);
        assert_eq!(c.grid().state(CellPos::new(1, 0)), CellState::Barrier);
    }

    #[test]
    fn out_of_bounds_pointer_is_ignored() {
        let mut c = controller(3);
        c.handle(InputEvent::PointerMoved { x: 31.0, y: 5.0 });
        c.handle(InputEvent::PrimaryDown);
        c.handle(InputEvent::SecondaryDown);
        assert_eq!(c.phase(), Phase::NoStart);
        assert_eq!(c.grid().revision(), 0);
    }

    #[test]
    fn run_key_requires_both_endpoints() {
        let mut c = controller(3);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        c.handle(InputEvent::KeyDown(Key::Run));
        assert_eq!(c.phase(), Phase::HasStart);
        assert_eq!(c.run_blocking(&mut ()), None);
    }

    #[test]
    fn running_ignores_edits_and_returns_to_has_start_end() {
        let mut c = controller(6);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 5, 5, InputEvent::PrimaryDown);
        c.handle(InputEvent::KeyDown(Key::Run));
        assert_eq!(c.phase(), Phase::Running);

        c.advance(2, &mut ());
        let revision = c.grid().revision();
        click(&mut c, 3, 0, InputEvent::PrimaryDown);
        click(&mut c, 5, 5, InputEvent::SecondaryDown);
        c.handle(InputEvent::KeyDown(Key::ClearSearch));
        assert_eq!(c.grid().revision(), revision);
        assert_eq!(c.handle(InputEvent::KeyDown(Key::PasteLayout)), Response::Continue);

        let outcome = c.advance(usize::MAX, &mut ()).unwrap();
        assert_eq!(outcome.path_len(), Some(10));
        assert_eq!(c.phase(), Phase::HasStartEnd);
        assert_eq!(c.grid().count(CellState::Path), 9);
    }

    #[test]
    fn cancel_restores_endpoints() {
        let mut c = controller(6);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 0, 1, InputEvent::PrimaryDown);
        c.begin_run();
        c.advance(1, &mut ());
        assert_eq!(c.grid().state(CellPos::new(0, 1)), CellState::Frontier);

        c.handle(InputEvent::KeyDown(Key::Cancel));
        assert_eq!(c.phase(), Phase::HasStartEnd);
        assert!(matches!(c.last_outcome(), Some(SearchOutcome::Cancelled { .. })));
        assert_eq!(c.grid().state(CellPos::new(0, 1)), CellState::End);
        assert_eq!(c.grid().state(CellPos::new(0, 0)), CellState::Start);
    }

    #[test]
    fn reset_during_run_cancels_first() {
        let mut c = controller(8).with_action_log(ActionLog::new());
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 7, 7, InputEvent::PrimaryDown);
        c.begin_run();
        c.advance(5, &mut ());

        c.handle(InputEvent::KeyDown(Key::Reset));
        assert_eq!(c.phase(), Phase::NoStart);
        assert_eq!(c.grid().count(CellState::Empty), 64);
        assert_eq!(c.last_outcome(), None);

        let actions: Vec<&Action> = c.action_log().unwrap().actions().iter().map(|a| &a.action).collect();
        assert!(matches!(
            actions[actions.len() - 2],
            Action::RunFinished { result, .. } if result == "cancelled"
        ));
        assert_eq!(actions[actions.len() - 1], &Action::Reset);
    }

    #[test]
    fn quit_cancels_and_reports() {
        let mut c = controller(4);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 3, 3, InputEvent::PrimaryDown);
        c.begin_run();
        c.advance(2, &mut ());
        assert_eq!(c.handle(InputEvent::Quit), Response::Quit);
        assert!(!c.is_running());
        assert!(matches!(c.last_outcome(), Some(SearchOutcome::Cancelled { expanded: 2 })));
        // Nothing left to drive once the session has quit
        assert_eq!(c.advance(usize::MAX, &mut ()), None);
        assert_eq!(c.grid().count(CellState::Path), 0);
    }

    #[test]
    fn copy_and_paste_layout() {
        let mut c = controller(3);
        click(&mut c, 0, 0, InputEvent::PrimaryDown);
        click(&mut c, 2, 2, InputEvent::PrimaryDown);
        click(&mut c, 1, 1, InputEvent::PrimaryDown);
        let Response::CopyLayout(text) = c.handle(InputEvent::KeyDown(Key::CopyLayout)) else {
            panic!("expected layout text");
        };
        assert_eq!(text, "S..\n.#.\n..E\n");

        assert_eq!(c.handle(InputEvent::KeyDown(Key::PasteLayout)), Response::PasteRequested);
        let bigger = Layout::parse("E...\n....\n....\n...S\n").unwrap();
        assert!(c.load_layout(&bigger).unwrap());
        assert_eq!(c.grid().rows(), 4);
        assert_eq!(c.start(), Some(CellPos::new(3, 3)));
        assert_eq!(c.end(), Some(CellPos::new(0, 0)));
        assert_eq!(c.phase(), Phase::HasStartEnd);
    }
}
