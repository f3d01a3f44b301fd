use crate::catalog::PaletteEntry;
use crate::grid::GridModel;

/// How many beads of one palette color a grid uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageStat<'a> {
    pub index: usize,
    pub entry: &'a PaletteEntry,
    pub count: u32,
}

/// Count beads per color, most used first.
///
/// Only colors that actually occur are listed. Equal counts keep palette
/// order. An all-empty grid gives an empty list.
pub fn aggregate(grid: &GridModel) -> Vec<UsageStat<'_>> {
    let palette = grid.palette();
    let mut counts = vec![0u32; palette.len()];
    for idx in grid.cells().iter().filter_map(|c| c.index()) {
        counts[idx] += 1;
    }

    let mut stats: Vec<UsageStat<'_>> = palette
        .iter()
        .zip(counts)
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(index, (entry, count))| UsageStat {
            index,
            entry,
            count,
        })
        .collect();
    // Stable sort: ties stay in palette order.
    stats.sort_by(|a, b| b.count.cmp(&a.count));

    log::debug!("{} distinct bead colors in use", stats.len());
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Palette;
    use crate::quantize::GridCell;

    fn grid(cells: Vec<GridCell>) -> GridModel {
        let w = cells.len() as u32;
        GridModel::from_cells(w, 1, cells, Palette::standard().unwrap()).unwrap()
    }

    #[test]
    fn sorted_by_count_then_palette_order() {
        let g = grid(vec![
            GridCell::Assigned(5),
            GridCell::Assigned(1),
            GridCell::Assigned(9),
            GridCell::Assigned(9),
            GridCell::Empty,
        ]);
        let stats = aggregate(&g);
        let ids: Vec<(&str, u32)> = stats.iter().map(|s| (s.entry.id(), s.count)).collect();
        assert_eq!(ids, vec![("C10", 2), ("C02", 1), ("C06", 1)]);
    }

    #[test]
    fn empty_grid_has_no_stats() {
        let g = grid(vec![GridCell::Empty; 4]);
        assert!(aggregate(&g).is_empty());
    }

    #[test]
    fn counts_sum_to_assigned_cells() {
        let g = grid(vec![
            GridCell::Assigned(3),
            GridCell::Empty,
            GridCell::Assigned(3),
            GridCell::Assigned(47),
        ]);
        let total: u32 = aggregate(&g).iter().map(|s| s.count).sum();
        assert_eq!(total as usize, g.assigned_count());
    }
}
