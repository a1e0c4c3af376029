use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Game phase, moves only forward: `NotStarted -> InProgress -> Won | Lost`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Mines not placed yet
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_not_started(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Single-player game from first move to end.
///
/// Mines are placed by `P` on the first accepted reveal, excluding the revealed cell. Once the game is won or lost
/// every mutating call fails with [`GameError::AlreadyEnded`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine<P = RandomMinePlacer> {
    config: GameConfig,
    placer: Option<P>,
    mine_layout: MineLayout,
    board: Array2<CellState>,
    covered_safe_count: CellCount,
    flagged_count: CellCount,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

#[cfg(feature = "std")]
impl PlayEngine<RandomMinePlacer> {
    /// New game with randomly seeded mine placement.
    pub fn new(config: GameConfig) -> Self {
        Self::from_parts(config, RandomMinePlacer::from_entropy(StartTile::default()))
    }

    /// Validates the dimensions and starts a randomly seeded game.
    pub fn from_dimensions(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        Ok(Self::new(GameConfig::new((width, height), mines)?))
    }
}

impl PlayEngine<RandomMinePlacer> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_parts(config, RandomMinePlacer::new(seed, StartTile::default()))
    }
}

impl<P: MinePlacer> PlayEngine<P> {
    /// New game placing mines with `placer`, which has to accept `config`.
    pub fn with_placer(config: GameConfig, placer: P) -> Result<Self> {
        placer.check_config(config)?;
        Ok(Self::from_parts(config, placer))
    }

    fn from_parts(config: GameConfig, placer: P) -> Self {
        Self {
            config,
            placer: Some(placer),
            mine_layout: MineLayout::empty(config.size),
            board: Array2::default(config.size.to_nd_index()),
            covered_safe_count: config.safe_cell_count(),
            flagged_count: 0,
            state: EngineState::NotStarted,
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn width(&self) -> Coord {
        self.config.width()
    }

    pub fn height(&self) -> Coord {
        self.config.height()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flags_used(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus placed flags, negative when the player placed more flags than there are mines.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    /// Safe cells that are still covered.
    pub fn covered_safe_count(&self) -> CellCount {
        self.covered_safe_count
    }

    /// First mine revealed in a lost game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    /// Adjacent mine count of a revealed cell, `None` for any other cell.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<Option<u8>> {
        Ok(self.cell_at(coords)?.adjacent_mines())
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(
            self.config,
            self.mines_left(),
            self.state,
            self.board.clone(),
        )
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.config.validate_coords(coords) {
            Ok(coords) => self.is_chordable(coords),
            Err(_) => false,
        }
    }

    /// Cycles a covered cell through `Hidden -> Flagged -> Questioned -> Hidden`.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.board[coords.to_nd_index()];
        let Some(next) = cell.next_mark() else {
            log::debug!("Cannot mark uncovered cell at {:?}", coords);
            return Ok(MarkOutcome::NoChange);
        };

        self.set_mark(coords, next);
        Ok(MarkOutcome::Changed)
    }

    /// Flags every covered neighbor of a revealed cell when they must all be mines.
    pub fn chord_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.config.validate_coords(coords)?;
        self.check_not_finished()?;

        let CellState::Revealed(count) = self.board[coords.to_nd_index()] else {
            return Ok(NoChange);
        };

        if count != self.count_neighbors(coords, CellState::is_covered) {
            return Ok(NoChange);
        }

        let mut updated = NoChange;
        for pos in self.mine_layout.iter_neighbors(coords) {
            if matches!(
                self.board[pos.to_nd_index()],
                CellState::Hidden | CellState::Questioned
            ) {
                self.set_mark(pos, CellState::Flagged);
                updated = Changed;
            }
        }

        Ok(updated)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.board[coords.to_nd_index()] != CellState::Hidden {
            log::debug!("Ignoring reveal of non-hidden cell at {:?}", coords);
            return Ok(RevealOutcome::NoChange);
        }

        self.place_mines(coords);
        let outcome = self.reveal_single_cell(coords);
        Ok(self.finish_move(outcome))
    }

    /// Reveals all hidden neighbors of a revealed cell whose flagged neighbors match its mine count.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.is_chordable(coords) {
            log::debug!("Chord rejected at {:?}", coords);
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = self
            .mine_layout
            .iter_neighbors(coords)
            .map(|neighbor_coords| self.reveal_single_cell(neighbor_coords))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor);
        Ok(self.finish_move(outcome))
    }

    /// Runs the placer on the first reveal, later calls are no-ops.
    fn place_mines(&mut self, start: Coord2) {
        let Some(placer) = self.placer.take() else {
            return;
        };

        self.mine_layout = placer.place(self.config, start);
        // nothing is revealed yet
        self.covered_safe_count = self.mine_layout.safe_cell_count();
        self.state = EngineState::InProgress;
        log::info!(
            "Game started at {:?} on a {}x{} board with {} mines",
            start,
            self.config.width(),
            self.config.height(),
            self.mine_layout.mine_count()
        );
    }

    /// Reveals one hidden cell and cascades through zero cells, without evaluating the end of the game.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell_state = self.board[coords.to_nd_index()];
        let has_mine = self.mine_layout[coords];

        match (cell_state, has_mine) {
            (CellState::Hidden, true) => {
                log::debug!("Mine hit at {:?}", coords);
                self.board[coords.to_nd_index()] = CellState::Exploded;
                self.triggered_mine.get_or_insert(coords);
                RevealOutcome::HitMine
            }
            (CellState::Hidden, false) => {
                self.flood_fill(coords);
                RevealOutcome::Revealed
            }
            _ => RevealOutcome::NoChange,
        }
    }

    /// Uncovers a safe cell and, if it has no adjacent mines, every hidden cell reachable through zero cells.
    ///
    /// Cells are uncovered when queued so each one is counted once. Marked cells stop the cascade.
    fn flood_fill(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::new();
        if self.uncover_safe(start) == 0 {
            to_visit.push_back(start);
        }

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.mine_layout.iter_neighbors(visit_coords) {
                if self.board[pos.to_nd_index()] != CellState::Hidden {
                    continue;
                }

                // neighbors of a zero cell are never mines
                if self.uncover_safe(pos) == 0 {
                    to_visit.push_back(pos);
                }
            }
        }
    }

    fn uncover_safe(&mut self, coords: Coord2) -> u8 {
        let count = self.mine_layout.adjacent_mine_count(coords);
        self.board[coords.to_nd_index()] = CellState::Revealed(count);
        self.covered_safe_count = self.covered_safe_count.saturating_sub(1);
        log::trace!("Opened cell at {:?}, mine count: {}", coords, count);
        count
    }

    fn finish_move(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        match outcome {
            RevealOutcome::HitMine => {
                self.end_game(false);
                RevealOutcome::HitMine
            }
            RevealOutcome::Revealed if self.covered_safe_count == 0 => {
                self.end_game(true);
                RevealOutcome::Won
            }
            outcome => outcome,
        }
    }

    /// Freezes the game and reclassifies flags and mines for display.
    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::info!("Game ended, state: {:?}", self.state);

        let mine_layout = &self.mine_layout;
        for ((x, y), cell) in self.board.indexed_iter_mut() {
            let has_mine = mine_layout[(x as Coord, y as Coord)];
            *cell = match (*cell, has_mine) {
                (CellState::Flagged, false) => CellState::IncorrectFlag,
                (CellState::Flagged, true) => CellState::CorrectMine,
                (CellState::Hidden | CellState::Questioned, true) => CellState::UnflaggedMine,
                (other, _) => other,
            };
        }
    }

    fn set_mark(&mut self, coords: Coord2, next: CellState) {
        let cell = &mut self.board[coords.to_nd_index()];
        match (*cell, next) {
            (CellState::Flagged, CellState::Flagged) => {}
            (_, CellState::Flagged) => self.flagged_count += 1,
            (CellState::Flagged, _) => self.flagged_count -= 1,
            _ => {}
        }
        *cell = next;
    }

    fn is_chordable(&self, coords: Coord2) -> bool {
        if let CellState::Revealed(count) = self.board[coords.to_nd_index()] {
            count == self.count_neighbors(coords, |cell| cell == CellState::Flagged)
        } else {
            false
        }
    }

    fn count_neighbors(&self, coords: Coord2, pred: impl Fn(CellState) -> bool) -> u8 {
        // at most 8 neighbors
        self.board
            .iter_neighbor_cells(coords)
            .filter(|&cell| pred(cell))
            .count() as u8
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
