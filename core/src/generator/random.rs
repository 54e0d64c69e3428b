use ndarray::Array2;
use rand::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use super::*;

/// Places mines uniformly at random without replacement, optionally keeping one cell free.
#[derive(Clone, Debug)]
pub struct RandomFieldGenerator {
    rng: SmallRng,
}

impl RandomFieldGenerator {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeds from the wall clock, for runs that do not need to be reproducible.
    pub fn from_entropy() -> Self {
        Self::seed_from_u64(clock_seed())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

impl FieldGenerator for RandomFieldGenerator {
    fn generate(
        &mut self,
        config: &GameConfig,
        excluded_cell: Option<Coord2>,
    ) -> Result<Minefield> {
        check_placement(config, excluded_cell)?;

        let width = usize::from(config.width);
        let excluded_index =
            excluded_cell.map(|(row, col)| usize::from(row) * width + usize::from(col));
        let mut candidates: Vec<usize> = (0..usize::from(config.total_cells()))
            .filter(|&index| Some(index) != excluded_index)
            .collect();

        // partial Fisher-Yates, the first `num_mines` slots end up as a uniform sample
        let num_mines = usize::from(config.num_mines);
        for slot in 0..num_mines {
            let pick = self.rng.random_range(slot..candidates.len());
            candidates.swap(slot, pick);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.shape().to_nd_index());
        for &index in &candidates[..num_mines] {
            mine_mask[[index / width, index % width]] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask)?;
        log::debug!(
            "Generated {}x{} minefield with {} mines, excluded cell: {:?}",
            config.height,
            config.width,
            layout.mine_count(),
            excluded_cell
        );
        Ok(Minefield::new(layout))
    }
}

fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()).rotate_left(32),
        Err(err) => {
            log::warn!("System clock before unix epoch, seeding from offset: {}", err);
            err.duration().as_nanos() as u64
        }
    }
}
