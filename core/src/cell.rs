use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// The first three variants are covered states cycled through by marking. `Revealed` is entered through reveals
/// only, the remaining variants only appear once the game has ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    /// Uncovered safe cell with its adjacent mine count
    Revealed(u8),
    /// The mine that ended the game
    Exploded,
    /// Mine left without a flag at the end of the game
    UnflaggedMine,
    /// Flagged mine at the end of the game
    CorrectMine,
    /// Flag placed on a safe cell, shown at the end of the game
    IncorrectFlag,
}

impl CellState {
    /// Whether the cell is still covered and can be marked.
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Questioned)
    }

    /// Next state in the `Hidden -> Flagged -> Questioned -> Hidden` marking cycle.
    pub const fn next_mark(self) -> Option<Self> {
        match self {
            Self::Hidden => Some(Self::Flagged),
            Self::Flagged => Some(Self::Questioned),
            Self::Questioned => Some(Self::Hidden),
            _ => None,
        }
    }

    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }

    /// Whether the cell shows a mine after the game ended.
    pub const fn is_mine(self) -> bool {
        matches!(
            self,
            Self::Exploded | Self::UnflaggedMine | Self::CorrectMine
        )
    }

    /// Single character used by the text rendering of a board.
    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Flagged => 'F',
            Self::Questioned => '?',
            Self::Revealed(0) => '.',
            Self::Revealed(count) => (b'0' + count) as char,
            Self::Exploded => 'X',
            Self::UnflaggedMine => '*',
            Self::CorrectMine => 'M',
            Self::IncorrectFlag => '!',
        }
    }
}
