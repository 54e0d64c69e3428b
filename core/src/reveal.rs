use crate::*;

/// Opens `coords` and cascades through zero-count neighbours.
///
/// The target must not be a mine, the caller checks that. Cells are marked open before their
/// neighbours are queued, so each cell enters the work-list at most once and the fill is bounded
/// by the number of cells. Returns how many cells were newly opened.
pub fn reveal(
    visibility: &mut VisibilityGrid,
    counts: &NeighborCountGrid,
    coords: Coord2,
) -> CellCount {
    let count = counts[coords];
    if !visibility.open(coords, count) {
        return 0;
    }
    log::trace!("Open cell at {:?}, mine count: {}", coords, count);

    let mut opened = 1;
    if count != 0 {
        return opened;
    }

    let bounds = visibility.size();
    let mut to_visit = vec![coords];
    while let Some(visit_coords) = to_visit.pop() {
        for neighbor in NeighborIter::new(visit_coords, bounds) {
            let neighbor_count = counts[neighbor];
            if !visibility.open(neighbor, neighbor_count) {
                continue;
            }
            opened += 1;
            log::trace!(
                "Flood opened cell at {:?}, mine count: {}",
                neighbor,
                neighbor_count
            );
            if neighbor_count == 0 {
                to_visit.push(neighbor);
            }
        }
    }
    log::debug!("Flood-fill from {:?} opened {} cells", coords, opened);
    opened
}
