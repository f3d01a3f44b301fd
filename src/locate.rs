use crate::catalog::PaletteEntry;
use crate::grid::GridModel;

/// Grid cell under a point of the rendered image.
///
/// `x`/`y` are in the rendered image's own pixel space; callers scale
/// display coordinates first. Returns `None` outside the image.
pub fn cell_at(x: f64, y: f64, cell_pixel_size: u32, grid: &GridModel) -> Option<(u32, u32)> {
    if cell_pixel_size == 0 || !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return None;
    }
    let size = cell_pixel_size as f64;
    let gx = (x / size).floor();
    let gy = (y / size).floor();
    if gx >= grid.width() as f64 || gy >= grid.height() as f64 {
        return None;
    }
    Some((gx as u32, gy as u32))
}

/// The bead color under a point of the rendered image, if any.
///
/// Points off the grid and points over empty cells both give `None`.
pub fn locate(x: f64, y: f64, cell_pixel_size: u32, grid: &GridModel) -> Option<&PaletteEntry> {
    let (gx, gy) = cell_at(x, y, cell_pixel_size, grid)?;
    grid.entry(gx, gy)
}
