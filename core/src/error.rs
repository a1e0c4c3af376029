use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must be at least 1x1")]
    EmptyBoard,
    #[error("Too many mines, requested {mines} but at most {max} fit with a safe first move")]
    TooManyMines { mines: CellCount, max: CellCount },
    #[error("Mine layout has {actual} mines, expected {expected}")]
    MineCountMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Mine placer was built for a different game config")]
    PlacerMismatch,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

impl GameError {
    /// Whether this error was raised while building a game rather than during play.
    pub const fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::EmptyBoard
                | Self::TooManyMines { .. }
                | Self::MineCountMismatch { .. }
                | Self::PlacerMismatch
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
