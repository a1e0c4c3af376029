use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Places the mines of a game once the first move is known.
///
/// Consumed on use, an engine holds its placer until the first reveal and never calls it again.
pub trait MinePlacer {
    fn place(self, config: GameConfig, start: Coord2) -> MineLayout;

    /// Rejects a game config this placer cannot fill with exactly `config.mines` mines.
    fn check_config(&self, _config: GameConfig) -> Result<()> {
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartTile {
    /// Only the first revealed cell is kept free of mines
    #[default]
    SimpleSafe,
    /// The first revealed cell and its neighbors are kept free of mines, when there is room for it
    AlwaysZero,
}

/// Places a predetermined set of mines, regardless of where the first move lands.
///
/// Meant for injecting known layouts in tests and replays. It does not keep the first move safe: a mine listed under
/// the first revealed cell ends the game on that move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedMinePlacer {
    config: GameConfig,
    mines: Vec<Coord2>,
}

impl FixedMinePlacer {
    pub fn new(config: GameConfig, mines: &[Coord2]) -> Result<Self> {
        let mut distinct = BTreeSet::new();
        for &coords in mines {
            distinct.insert(config.validate_coords(coords)?);
        }

        let actual = distinct.len() as CellCount;
        if actual != config.mines {
            return Err(GameError::MineCountMismatch {
                expected: config.mines,
                actual,
            });
        }

        Ok(Self {
            config,
            mines: distinct.into_iter().collect(),
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }
}

impl MinePlacer for FixedMinePlacer {
    fn place(self, config: GameConfig, start: Coord2) -> MineLayout {
        if self.mines.contains(&start) {
            log::warn!("Fixed layout has a mine under the first move at {:?}", start);
        }
        // coords were validated against `self.config`, which the engine checked equals `config`
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for coords in self.mines {
            mine_mask[coords.to_nd_index()] = true;
        }
        MineLayout::from_mine_mask(mine_mask)
    }

    fn check_config(&self, config: GameConfig) -> Result<()> {
        if config == self.config {
            Ok(())
        } else {
            Err(GameError::PlacerMismatch)
        }
    }
}
