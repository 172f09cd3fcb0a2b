pub mod action_log;
pub mod cell;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod layout;
pub mod render;
pub mod search;

pub use cell::{Cell, CellPos, CellState};
pub use controller::{Controller, InputEvent, Key, Phase, Response};
pub use grid::Grid;
pub use layout::Layout;
pub use render::{Palette, Renderer, Rgb};
pub use search::{run, SearchOutcome, SearchRun, StepObserver};
