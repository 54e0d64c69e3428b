use super::*;

/// Always hands out the same layout. Used for scripted boards and reproducing bug reports.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetFieldGenerator {
    layout: MineLayout,
}

impl PresetFieldGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        MineLayout::from_mine_coords(size, mine_coords).map(Self::new)
    }
}

impl FieldGenerator for PresetFieldGenerator {
    fn generate(
        &mut self,
        config: &GameConfig,
        excluded_cell: Option<Coord2>,
    ) -> Result<Minefield> {
        check_placement(config, excluded_cell)?;

        if self.layout.size() != config.shape() || self.layout.mine_count() != config.num_mines {
            return Err(GameError::InvalidConfiguration(
                ConfigProblem::LayoutMismatch,
            ));
        }
        if let Some(coords) = excluded_cell.filter(|&coords| self.layout.contains_mine(coords)) {
            log::warn!("Preset layout has a mine at excluded cell {:?}", coords);
            return Err(GameError::InvalidConfiguration(
                ConfigProblem::MineOnExcludedCell,
            ));
        }
        Ok(Minefield::new(self.layout.clone()))
    }
}
