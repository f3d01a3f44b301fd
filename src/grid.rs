use image::RgbaImage;

use crate::catalog::{Palette, PaletteEntry};
use crate::error::BeadError;
use crate::quantize::{GridCell, quantize};
use crate::sampler::sample;

/// The quantized bead grid: one [`GridCell`] per bead position.
///
/// Dimensions are fixed at construction and every cell is classified.
/// The grid carries the palette its indices point into, so it can be
/// rendered, counted and inspected on its own. A new grid is built for
/// every generation; nothing mutates one after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    width: u32,
    height: u32,
    cells: Vec<GridCell>,
    palette: Palette,
}

impl GridModel {
    /// Wrap already classified cells (row-major).
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: Vec<GridCell>,
        palette: Palette,
    ) -> Result<Self, BeadError> {
        if width == 0 || height == 0 {
            return Err(BeadError::invalid(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if cells.len() as u64 != width as u64 * height as u64 {
            return Err(BeadError::invalid(format!(
                "{} cells do not fill a {width}x{height} grid",
                cells.len()
            )));
        }
        if let Some(bad) = cells
            .iter()
            .filter_map(|c| c.index())
            .find(|&idx| idx >= palette.len())
        {
            return Err(BeadError::invalid(format!(
                "cell refers to palette index {bad}, palette has {} entries",
                palette.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<GridCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// The palette entry at `(x, y)`, if the cell is in bounds and assigned.
    pub fn entry(&self, x: u32, y: u32) -> Option<&PaletteEntry> {
        self.cell(x, y)?.index().and_then(|idx| self.palette.get(idx))
    }

    /// Cells of one row, left to right.
    pub fn row(&self, y: u32) -> Option<&[GridCell]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.cells.get(start..start + w)
    }

    /// Number of cells that received a bead.
    pub fn assigned_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Sample `img` down to `target_width` columns and classify every cell.
///
/// Cells are visited in row-major order. The result depends only on the
/// inputs, so the same call always yields an identical grid.
pub fn build_grid(
    img: &RgbaImage,
    target_width: u32,
    palette: &Palette,
) -> Result<GridModel, BeadError> {
    let samples = sample(img, target_width)?;
    let cells: Vec<GridCell> = samples
        .samples()
        .iter()
        .map(|&s| quantize(s, palette))
        .collect();

    let grid = GridModel::from_cells(samples.width(), samples.height(), cells, palette.clone())?;
    log::debug!(
        "built {}x{} bead grid against {} colors, {} beads placed",
        grid.width,
        grid.height,
        palette.len(),
        grid.assigned_count()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn from_cells_checks_shape_and_indices() {
        let palette = Palette::standard().unwrap();
        assert!(GridModel::from_cells(2, 1, vec![GridCell::Empty], palette.clone()).is_err());
        assert!(GridModel::from_cells(0, 0, Vec::new(), palette.clone()).is_err());
        assert!(GridModel::from_cells(1, 1, vec![GridCell::Assigned(48)], palette.clone()).is_err());
        assert!(GridModel::from_cells(1, 1, vec![GridCell::Assigned(47)], palette).is_ok());
    }

    #[test]
    fn accessors_respect_bounds() {
        let palette = Palette::standard().unwrap();
        let grid = GridModel::from_cells(
            2,
            2,
            vec![
                GridCell::Assigned(0),
                GridCell::Empty,
                GridCell::Empty,
                GridCell::Assigned(5),
            ],
            palette,
        )
        .unwrap();
        assert_eq!(grid.entry(0, 0).map(|e| e.id()), Some("C01"));
        assert_eq!(grid.entry(1, 1).map(|e| e.id()), Some("C06"));
        assert!(grid.entry(1, 0).is_none());
        assert!(grid.cell(2, 0).is_none());
        assert!(grid.row(2).is_none());
        assert_eq!(grid.row(1), Some(&[GridCell::Empty, GridCell::Assigned(5)][..]));
        assert_eq!(grid.assigned_count(), 2);
    }

    #[test]
    fn transparent_pixel_yields_empty_cell() {
        let palette = Palette::standard().unwrap();
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let grid = build_grid(&img, 1, &palette).unwrap();
        assert_eq!(grid.cells(), &[GridCell::Empty]);
    }

    #[test]
    fn invalid_width_produces_no_grid() {
        let palette = Palette::standard().unwrap();
        let img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        assert!(matches!(
            build_grid(&img, 0, &palette),
            Err(BeadError::InvalidInput(_))
        ));
    }
}
