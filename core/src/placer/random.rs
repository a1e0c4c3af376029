use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Generation strategy that keeps the starting tile safe, optionally with its neighbors, but other than that is purely
/// random.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomMinePlacer {
    seed: u64,
    start_tile: StartTile,
}

impl RandomMinePlacer {
    pub fn new(seed: u64, start_tile: StartTile) -> Self {
        Self { seed, start_tile }
    }

    /// Placer seeded from the thread-local generator.
    #[cfg(feature = "std")]
    pub fn from_entropy(start_tile: StartTile) -> Self {
        use rand::Rng;
        Self::new(rand::rng().random(), start_tile)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn start_tile(&self) -> StartTile {
        self.start_tile
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(self, config: GameConfig, start: Coord2) -> MineLayout {
        use StartTile::*;

        let total_tiles = config.total_cells();

        let actual_start_tile = match self.start_tile {
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + 9 > total_tiles => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        let mut excluded: Array2<bool> = Array2::default(config.size.to_nd_index());
        excluded[start.to_nd_index()] = true;
        if actual_start_tile == AlwaysZero {
            for coords in excluded.iter_neighbors(start) {
                excluded[coords.to_nd_index()] = true;
            }
        }

        let candidates: Vec<Coord2> = excluded
            .indexed_iter()
            .filter(|&(_, &is_excluded)| !is_excluded)
            .map(|((x, y), _)| (x as Coord, y as Coord))
            .collect();

        // every candidate subset of the requested size is equally likely
        let amount = usize::from(config.mines).min(candidates.len());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        for i in index::sample(&mut rng, candidates.len(), amount) {
            mines[candidates[i].to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mines);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Placed {} mines with seed {}, keeping {:?} safe",
            layout.mine_count(),
            self.seed,
            start
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_tile_is_never_a_mine() {
        let config = GameConfig::new((4, 4), 15).unwrap();
        for seed in 0..200 {
            let start = ((seed % 4) as Coord, (seed / 4 % 4) as Coord);
            let layout = RandomMinePlacer::new(seed, StartTile::SimpleSafe).place(config, start);

            assert!(!layout.contains_mine(start), "seed {seed}");
            assert_eq!(layout.mine_count(), 15);
        }
    }

    #[test]
    fn always_zero_clears_neighbors() {
        let config = GameConfig::new((5, 5), 16).unwrap();
        for seed in 0..50 {
            let layout = RandomMinePlacer::new(seed, StartTile::AlwaysZero).place(config, (2, 2));

            assert_eq!(layout.adjacent_mine_count((2, 2)), 0);
            assert!(!layout.contains_mine((2, 2)));
            assert_eq!(layout.mine_count(), 16);
        }
    }

    #[test]
    fn always_zero_falls_back_when_crowded() {
        let config = GameConfig::new((3, 3), 8).unwrap();
        let layout = RandomMinePlacer::new(7, StartTile::AlwaysZero).place(config, (1, 1));

        assert!(!layout.contains_mine((1, 1)));
        assert_eq!(layout.mine_count(), 8);
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let a = RandomMinePlacer::new(42, StartTile::SimpleSafe).place(config, (4, 4));
        let b = RandomMinePlacer::new(42, StartTile::SimpleSafe).place(config, (4, 4));

        assert_eq!(a, b);
    }

    #[test]
    fn placement_spreads_over_all_candidates() {
        let config = GameConfig::new((3, 1), 1).unwrap();
        let mut hits = [0u32; 3];
        for seed in 0..400 {
            let layout = RandomMinePlacer::new(seed, StartTile::SimpleSafe).place(config, (0, 0));
            for (x, _) in layout.iter_mines() {
                hits[usize::from(x)] += 1;
            }
        }

        assert_eq!(hits[0], 0);
        assert_eq!(hits[1] + hits[2], 400);
        assert!(hits[1] > 120 && hits[2] > 120, "{hits:?}");
    }
}
