use serde::{Deserialize, Serialize};

use crate::*;

/// Construction parameters of an episode controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: Coord,
    pub width: Coord,
    pub num_mines: CellCount,
    /// Defer mine placement to the first step and keep the clicked cell safe.
    pub prevent_first_bomb: bool,
    /// Fixed generator seed, drawn from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::intermediate()
    }
}

impl GameConfig {
    pub const fn new_unchecked(
        height: Coord,
        width: Coord,
        num_mines: CellCount,
        prevent_first_bomb: bool,
    ) -> Self {
        Self {
            height,
            width,
            num_mines,
            prevent_first_bomb,
            seed: None,
        }
    }

    pub fn new(
        height: Coord,
        width: Coord,
        num_mines: CellCount,
        prevent_first_bomb: bool,
    ) -> Result<Self> {
        let config = Self::new_unchecked(height, width, num_mines, prevent_first_bomb);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10, true)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40, true)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99, true)
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        use ConfigProblem::*;

        if self.height == 0 || self.width == 0 {
            return Err(GameError::InvalidConfiguration(EmptyBoard));
        }
        let total_cells = self.total_cells();
        if self.num_mines >= total_cells {
            return Err(GameError::InvalidConfiguration(TooManyMines));
        }
        if self.prevent_first_bomb && self.num_mines >= total_cells - 1 {
            return Err(GameError::InvalidConfiguration(TooManyMinesForSafeStart));
        }
        Ok(())
    }

    pub const fn shape(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.num_mines)
    }

    /// Step budget of one episode, twice the number of safe cells.
    pub const fn max_steps(&self) -> u32 {
        2 * self.safe_cells() as u32
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.height && col < self.width
    }
}
