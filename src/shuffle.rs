// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Scrambling a grid before play.

use crate::grid::Grid;
use crate::Position;
use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;

/// The number of Fisher–Yates passes applied by [`shuffle`].
pub const DEFAULT_PASSES: usize = 3;

/// Upper bound on the passes [`shuffle_passes`] applies, whatever it is asked for.
pub const MAX_PASSES: usize = 16;

/// How many times a draw that lands on the solved arrangement is redrawn.
const MAX_REDRAWS: usize = 16;

/// A copy of `grid` whose tiles occupy a uniformly random permutation of its current cells. The
/// identities (and so the correct cells) of the tiles are untouched.
pub fn shuffle<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    shuffle_passes(grid, rng, DEFAULT_PASSES)
}

/// Like [`shuffle`], applying `passes` Fisher–Yates passes in sequence to the list of cells before
/// handing them back out to the tiles in their original order. At least one and at most
/// [`MAX_PASSES`] passes are applied.
///
/// For boards of two or more tiles the result is never the solved arrangement, unless `rng` keeps
/// producing it; after a bounded number of redraws the last draw is kept.
pub fn shuffle_passes<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, passes: usize) -> Grid {
    let mut positions: Vec<Position> = grid.arrangement();
    if positions.len() < 2 {
        log::debug!("grid of {} tile(s) has nothing to shuffle", positions.len());
        return grid.clone();
    }

    let passes = passes.clamp(1, MAX_PASSES);
    for attempt in 0..=MAX_REDRAWS {
        for _ in 0..passes {
            positions.shuffle(rng);
        }
        let candidate = grid.rearranged(&positions);
        if !candidate.is_complete() {
            return candidate;
        }
        log::debug!("shuffle attempt {attempt} produced a solved grid, redrawing");
    }
    log::warn!("random source kept producing solved grids, keeping the last draw");
    grid.rearranged(&positions)
}

#[cfg(test)]
mod test {
    extern crate std;

    use crate::grid::{Grid, TileId};
    use crate::shuffle::{shuffle, shuffle_passes, MAX_PASSES};
    use crate::Position;
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use core::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn cells(side: usize) -> BTreeSet<Position> {
        (0..side)
            .flat_map(|row| (0..side).map(move |column| Position::new(row, column)))
            .collect()
    }

    #[test]
    fn shuffled_grids_are_permutations() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for side in 3..=5 {
            let grid = Grid::new(side)?;
            for _ in 0..50 {
                let shuffled = shuffle(&grid, &mut rng);
                assert!(shuffled.positions_valid());
                assert!(!shuffled.is_complete());
                let seen: BTreeSet<Position> = shuffled.arrangement().into_iter().collect();
                assert_eq!(cells(side), seen);
                for (before, after) in grid.tiles().iter().zip(shuffled.tiles()) {
                    assert_eq!(before.id(), after.id());
                    assert_eq!(before.correct(), after.correct());
                }
            }
        }
        Ok(())
    }

    #[test]
    fn reshuffles_differ() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut previous = shuffle(&Grid::new(3)?, &mut rng);
        for _ in 0..100 {
            let next = shuffle(&previous, &mut rng);
            assert!(next.positions_valid());
            assert_ne!(previous.arrangement(), next.arrangement());
            previous = next;
        }
        Ok(())
    }

    #[test]
    fn seeded_shuffles_are_reproducible() -> Result<(), Box<dyn Error>> {
        let grid = Grid::new(4)?;
        let first = shuffle(&grid, &mut StdRng::seed_from_u64(42));
        let second = shuffle(&grid, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);

        let single = shuffle_passes(&grid, &mut StdRng::seed_from_u64(42), 1);
        assert!(single.positions_valid());
        Ok(())
    }

    #[test]
    fn pass_count_is_bounded() -> Result<(), Box<dyn Error>> {
        let grid = Grid::new(5)?;
        let capped = shuffle_passes(&grid, &mut StdRng::seed_from_u64(9), usize::MAX);
        let most = shuffle_passes(&grid, &mut StdRng::seed_from_u64(9), MAX_PASSES);
        assert_eq!(most, capped);

        let none = shuffle_passes(&grid, &mut StdRng::seed_from_u64(9), 0);
        let one = shuffle_passes(&grid, &mut StdRng::seed_from_u64(9), 1);
        assert_eq!(one, none);
        Ok(())
    }

    #[test]
    fn tiny_grids() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(1);
        let single = Grid::new(1)?;
        assert_eq!(single, shuffle(&single, &mut rng));

        let pair = Grid::new(2)?;
        for _ in 0..20 {
            assert!(!shuffle(&pair, &mut rng).is_complete());
        }
        Ok(())
    }

    #[test]
    fn degenerate_rng_keeps_a_valid_grid() -> Result<(), Box<dyn Error>> {
        // a constant source always draws the same swaps
        let mut rng = StepRng::new(0, 0);
        let grid = Grid::new(3)?;
        let shuffled = shuffle(&grid, &mut rng);
        assert!(shuffled.positions_valid());
        assert!(shuffled.tile(TileId::new(2, 2)).is_some());
        Ok(())
    }
}
