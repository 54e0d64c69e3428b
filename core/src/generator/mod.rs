use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Produces the hidden minefield of an episode.
pub trait FieldGenerator {
    /// Builds a minefield for `config`. When `excluded_cell` is set, that cell is never a mine.
    fn generate(&mut self, config: &GameConfig, excluded_cell: Option<Coord2>) -> Result<Minefield>;
}

/// Checks the placement precondition shared by every generator.
pub(crate) fn check_placement(config: &GameConfig, excluded_cell: Option<Coord2>) -> Result<()> {
    use ConfigProblem::*;

    if config.height == 0 || config.width == 0 {
        return Err(GameError::InvalidConfiguration(EmptyBoard));
    }
    let total_cells = config.total_cells();
    if config.num_mines >= total_cells {
        return Err(GameError::InvalidConfiguration(TooManyMines));
    }
    if let Some(coords) = excluded_cell {
        if !config.contains(coords) {
            return Err(GameError::InvalidAction);
        }
        if config.num_mines >= total_cells - 1 {
            return Err(GameError::InvalidConfiguration(TooManyMinesForSafeStart));
        }
    }
    Ok(())
}
