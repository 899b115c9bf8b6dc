use std::io;

use thiserror::Error;

/// Everything that can keep the game from starting.
///
/// Once the game loop runs, nothing short of a quit key ends it.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("standard output is not a terminal")]
    NotATerminal,

    #[error("failed to set up the terminal: {0}")]
    Terminal(#[from] io::Error),

    #[error("board must have at least one cell, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("board of {width}x{height} cells does not fit on a terminal")]
    BoardTooLarge { width: usize, height: usize },

    #[error("density must lie within 0 and 1, got {0}")]
    InvalidDensity(f64),
}
