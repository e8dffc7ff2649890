//! Error types for maze construction, program evaluation and simulation.

use std::io;

use thiserror::Error;

use crate::maze::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze has no start cell")]
    MissingStart,

    #[error("maze has more than one start cell ({first} and {second})")]
    DuplicateStart { first: Position, second: Position },

    #[error("start {start} is off the grid or inside a wall")]
    InvalidStart { start: Position },

    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

/// Why a controller program failed to produce a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("program ended without yielding a move")]
    NoMove,

    #[error("stack underflow at token {at}")]
    StackUnderflow { at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("unknown program token {token:?} at index {index}")]
    UnknownToken { token: String, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The controller could not decide a move; the run cannot continue.
    #[error("invalid controller at move {step}: {source}")]
    InvalidController {
        step: usize,
        #[source]
        source: EvalError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "serde")]
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
