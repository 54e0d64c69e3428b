use core::ops::Index;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

/// Hidden mine placement of one episode, `true` marks a mine.
///
/// Serialized as the bare mask, the mine count is recomputed on the way back in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a mask whose dimensions fit in `Coord`.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidConfiguration(ConfigProblem::EmptyBoard));
        }
        if Coord::try_from(rows).is_err() || Coord::try_from(cols).is_err() {
            return Err(GameError::InvalidConfiguration(
                ConfigProblem::LayoutMismatch,
            ));
        }
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        // at most Coord::MAX^2 cells, which fits in CellCount
        let mine_count = CellCount::try_from(mine_count).unwrap_or(CellCount::MAX);
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidAction);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.mine_mask.view()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // never more than the 8 neighbours
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Per-cell count of adjacent mines, derived once from a [`MineLayout`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NeighborCountGrid {
    counts: Array2<u8>,
}

impl NeighborCountGrid {
    pub fn from_layout(layout: &MineLayout) -> Self {
        let (rows, cols) = layout.size();
        let mut counts = Array2::zeros(layout.size().to_nd_index());
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                counts[coords.to_nd_index()] = layout.adjacent_mine_count(coords);
            }
        }
        Self { counts }
    }

    pub fn count_at(&self, coords: Coord2) -> u8 {
        self.counts[coords.to_nd_index()]
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.counts.view()
    }
}

impl Index<Coord2> for NeighborCountGrid {
    type Output = u8;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.counts[coords.to_nd_index()]
    }
}

/// A mine layout together with the neighbour counts computed from it.
///
/// Only the layout is serialized, deserializing recomputes the counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MineLayout", into = "MineLayout")]
pub struct Minefield {
    layout: MineLayout,
    counts: NeighborCountGrid,
}

impl Minefield {
    pub fn new(layout: MineLayout) -> Self {
        let counts = NeighborCountGrid::from_layout(&layout);
        Self { layout, counts }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn counts(&self) -> &NeighborCountGrid {
        &self.counts
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.layout.contains_mine(coords)
    }
}

impl From<MineLayout> for Minefield {
    fn from(layout: MineLayout) -> Self {
        Self::new(layout)
    }
}

impl From<Minefield> for MineLayout {
    fn from(field: Minefield) -> Self {
        field.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_zero_padded_at_edges() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap();
        let counts = NeighborCountGrid::from_layout(&layout);

        assert_eq!(counts[(0, 0)], 0);
        assert_eq!(counts[(1, 1)], 1);
        assert_eq!(counts[(2, 1)], 1);
        assert_eq!(counts[(0, 2)], 0);
        // a mine does not count itself
        assert_eq!(counts[(2, 2)], 0);
    }

    #[test]
    fn center_surrounded_by_mines_counts_eight() {
        let ring = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 2),
            (2, 0),
            (2, 1),
            (2, 2),
        ];
        let layout = MineLayout::from_mine_coords((3, 3), &ring).unwrap();

        assert_eq!(layout.mine_count(), 8);
        assert_eq!(layout.safe_cell_count(), 1);
        assert_eq!(Minefield::new(layout).counts()[(1, 1)], 8);
    }

    #[test]
    fn rectangular_layout_keeps_row_col_orientation() {
        let layout = MineLayout::from_mine_coords((2, 4), &[(0, 3)]).unwrap();

        assert_eq!(layout.size(), (2, 4));
        assert!(layout.contains_mine((0, 3)));
        assert_eq!(NeighborCountGrid::from_layout(&layout)[(1, 2)], 1);
    }

    #[test]
    fn deserialized_field_recomputes_counts() {
        let field = Minefield::new(MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap());
        let mut payload = serde_json::to_value(&field).unwrap();
        assert!(payload.get("counts").is_none());
        assert!(payload.get("mine_count").is_none());

        // mark a second mine in the raw mask
        payload["data"][3] = serde_json::Value::Bool(true);
        let restored: Minefield = serde_json::from_value(payload).unwrap();

        assert_eq!(restored.layout().mine_count(), 2);
        assert_eq!(restored.counts()[(0, 1)], 2);
        assert_eq!(restored.counts()[(1, 1)], 1);
        assert_eq!(restored, Minefield::new(restored.layout().clone()));
    }

    #[test]
    fn deserialized_layout_keeps_mine_count_in_sync() {
        let layout = MineLayout::from_mine_coords((3, 2), &[(2, 1), (0, 0)]).unwrap();

        let restored: MineLayout =
            serde_json::from_value(serde_json::to_value(&layout).unwrap()).unwrap();

        assert_eq!(restored, layout);
        assert_eq!(restored.mine_count(), 2);
    }

    #[test]
    fn deserialization_rejects_boards_that_do_not_fit() {
        let empty = serde_json::to_value(Array2::<bool>::default([0, 2])).unwrap();
        assert!(serde_json::from_value::<MineLayout>(empty).is_err());

        let too_tall = serde_json::to_value(Array2::<bool>::default([300, 1])).unwrap();
        assert!(serde_json::from_value::<Minefield>(too_tall).is_err());
    }

    #[test]
    fn out_of_bounds_mine_is_rejected() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidAction)
        );
    }
}
