use serde::{Deserialize, Serialize};

use crate::*;

/// Request to open the cell at `(row, col)`, not yet checked against a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub row: i64,
    pub col: i64,
}

impl Action {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Decodes the flattened row-major `Discrete(height * width)` encoding.
    pub fn from_flat_index(index: usize, config: &GameConfig) -> Result<Self> {
        if index >= usize::from(config.total_cells()) {
            return Err(GameError::InvalidAction);
        }
        let width = usize::from(config.width);
        Ok(Self::new((index / width) as i64, (index % width) as i64))
    }

    /// Bounds-checks the action against `config`.
    pub fn validate(self, config: &GameConfig) -> Result<Coord2> {
        let row = Coord::try_from(self.row).map_err(|_| GameError::InvalidAction)?;
        let col = Coord::try_from(self.col).map_err(|_| GameError::InvalidAction)?;
        if config.contains((row, col)) {
            Ok((row, col))
        } else {
            Err(GameError::InvalidAction)
        }
    }
}

impl From<Coord2> for Action {
    fn from((row, col): Coord2) -> Self {
        Self::new(row.into(), col.into())
    }
}

impl From<(i64, i64)> for Action {
    fn from((row, col): (i64, i64)) -> Self {
        Self::new(row, col)
    }
}

impl TryFrom<&[i64]> for Action {
    type Error = GameError;

    fn try_from(value: &[i64]) -> Result<Self> {
        match *value {
            [row, col] => Ok(Self::new(row, col)),
            _ => Err(GameError::InvalidAction),
        }
    }
}
