//! Error types for pathviz

use crate::cell::CellPos;
use thiserror::Error;

/// Grid construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row")]
    NoRows,

    #[error("grid width {width_px}px is too small for {rows} rows")]
    TooNarrow { rows: usize, width_px: u32 },
}

/// Precondition failures when starting a search run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("start and end are the same cell {0:?}")]
    SameEndpoints(CellPos),

    #[error("cell {0:?} is outside the grid")]
    OutOfBounds(CellPos),

    #[error("neighbor cache is stale; refresh it before searching")]
    StaleNeighbors,
}

/// Text layout parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("layout is not square: line {line} has {found} cells, expected {expected}")]
    NotSquare {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown glyph {glyph:?} at line {line}")]
    UnknownGlyph { glyph: char, line: usize },

    #[error("layout has more than one {0:?} cell")]
    Duplicate(char),
}

/// Configuration load errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),
}
