use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

/// Observation value of a cell that has not been opened yet.
pub const UNOPENED: i8 = -1;

pub const OBSERVATION_LOW: i8 = UNOPENED;
pub const OBSERVATION_HIGH: i8 = 8;

/// Player-visible grid: `-1` for unopened cells, the neighbour mine count otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibilityGrid {
    cells: Array2<i8>,
    opened: CellCount,
}

impl VisibilityGrid {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::from_elem(size.to_nd_index(), UNOPENED),
            opened: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn cell_at(&self, coords: Coord2) -> i8 {
        self.cells[coords.to_nd_index()]
    }

    pub fn is_opened(&self, coords: Coord2) -> bool {
        self.cell_at(coords) != UNOPENED
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened
    }

    pub fn view(&self) -> ArrayView2<'_, i8> {
        self.cells.view()
    }

    pub fn to_array(&self) -> Array2<i8> {
        self.cells.clone()
    }

    /// Opens `coords` showing `count`, returns false if it was already open.
    pub(crate) fn open(&mut self, coords: Coord2, count: u8) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if *cell != UNOPENED {
            return false;
        }
        // neighbour counts never exceed 8
        *cell = count as i8;
        self.opened += 1;
        true
    }
}

/// Step budget of an episode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCounter {
    used: u32,
    max: u32,
}

impl StepCounter {
    pub const fn new(max: u32) -> Self {
        Self { used: 0, max }
    }

    pub const fn used(&self) -> u32 {
        self.used
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }

    pub const fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Uses one unit of budget, returns false when none was left.
    pub fn consume(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }
}

/// Mutable state of one episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    visibility: VisibilityGrid,
    steps: StepCounter,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            visibility: VisibilityGrid::new(config.shape()),
            steps: StepCounter::new(config.max_steps()),
        }
    }

    pub fn visibility(&self) -> &VisibilityGrid {
        &self.visibility
    }

    pub(crate) fn visibility_mut(&mut self) -> &mut VisibilityGrid {
        &mut self.visibility
    }

    pub fn steps(&self) -> &StepCounter {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut StepCounter {
        &mut self.steps
    }

    pub fn count_opened(&self) -> CellCount {
        debug_assert_eq!(
            usize::from(self.visibility.opened),
            self.visibility.cells.iter().filter(|&&cell| cell != UNOPENED).count()
        );
        self.visibility.opened_count()
    }

    pub fn is_fully_cleared(&self, total_safe_cells: CellCount) -> bool {
        self.count_opened() == total_safe_cells
    }
}
