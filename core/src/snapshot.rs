use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned, read-only copy of everything a player can see on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub config: GameConfig,
    pub mines_left: isize,
    pub state: EngineState,
    pub cells: Array2<CellState>,
}

impl BoardSnapshot {
    pub fn new(
        config: GameConfig,
        mines_left: isize,
        state: EngineState,
        cells: Array2<CellState>,
    ) -> Self {
        Self {
            config,
            mines_left,
            state,
            cells,
        }
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn count_matching(&self, pred: impl Fn(CellState) -> bool) -> CellCount {
        self.cells.iter().filter(|&&cell| pred(cell)).count() as CellCount
    }

    pub fn covered_count(&self) -> CellCount {
        self.count_matching(CellState::is_covered)
    }
}

/// One line per row, top row first.
impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x_end, y_end) = self.config.size;
        for y in 0..y_end {
            for x in 0..x_end {
                write!(f, "{}", self.cells[(x, y).to_nd_index()].glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn engine(size: Coord2, mines: &[Coord2]) -> PlayEngine<FixedMinePlacer> {
        let config = GameConfig::new(size, mines.len() as CellCount).unwrap();
        PlayEngine::with_placer(config, FixedMinePlacer::new(config, mines).unwrap()).unwrap()
    }

    #[test]
    fn snapshot_copies_visible_state() {
        let mut engine = engine((3, 2), &[(2, 1)]);
        engine.reveal((0, 0)).unwrap();
        engine.toggle_mark((2, 1)).unwrap();

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.size(), (3, 2));
        assert_eq!(snapshot.mines_left, 0);
        assert_eq!(snapshot.state, EngineState::InProgress);
        assert_eq!(snapshot.cell((1, 1)).unwrap(), CellState::Revealed(1));
        assert_eq!(snapshot.cell((2, 1)).unwrap(), CellState::Flagged);
        assert_eq!(snapshot.cell((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(snapshot.covered_count(), 2);
    }

    #[test]
    fn snapshot_is_detached_from_engine() {
        let mut engine = engine((2, 1), &[(1, 0)]);
        let snapshot = engine.snapshot();

        engine.toggle_mark((1, 0)).unwrap();

        assert_eq!(snapshot.cell((1, 0)).unwrap(), CellState::Hidden);
    }

    #[test]
    fn display_renders_rows() {
        let mut engine = engine((3, 2), &[(2, 1)]);
        engine.reveal((0, 0)).unwrap();
        engine.toggle_mark((2, 1)).unwrap();

        assert_eq!(engine.snapshot().to_string(), ".1#\n.1F\n");
    }

    #[test]
    fn display_shows_end_of_game_marks() {
        let mut engine = engine((3, 1), &[(0, 0)]);
        engine.toggle_mark((2, 0)).unwrap();
        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.snapshot().to_string(), "X#!\n");
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let engine = engine((2, 2), &[(0, 0)]);

        let json = serde_json::to_value(engine.snapshot()).unwrap();

        assert_eq!(json["state"], "NotStarted");
        assert_eq!(json["mines_left"], 1);
    }
}
