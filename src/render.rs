use std::ops::Range;

use image::{Rgba, RgbaImage};
use palette::{Mix, Srgb};

use crate::error::BeadError;
use crate::grid::GridModel;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const MINOR_LINE: Rgba<u8> = Rgba([0xE0, 0xE0, 0xE0, 255]);
pub const MAJOR_LINE: Rgba<u8> = Rgba([0x88, 0x88, 0x88, 255]);

const MINOR_WEIGHT: u32 = 1;
const MAJOR_WEIGHT: u32 = 2;

/// Opacity of the white highlight painted on every bead.
const SHINE_OPACITY: f32 = 0.3;

/// How a [`GridModel`] is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParameters {
    /// Side of one bead cell in output pixels.
    pub cell_pixel_size: u32,
    /// Draw alignment lines over the beads.
    pub show_grid: bool,
    /// Every this many cells a heavier line is drawn; `0` disables them.
    pub grid_major_interval: u32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            cell_pixel_size: 15,
            show_grid: true,
            grid_major_interval: 10,
        }
    }
}

impl RenderParameters {
    pub fn validate(&self) -> Result<(), BeadError> {
        if self.cell_pixel_size == 0 {
            return Err(BeadError::invalid("cell pixel size must be positive"));
        }
        Ok(())
    }

    /// Output dimensions for a grid of `cols × rows` cells.
    pub fn output_size(&self, cols: u32, rows: u32) -> Result<(u32, u32), BeadError> {
        let s = self.cell_pixel_size;
        match (cols.checked_mul(s), rows.checked_mul(s)) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(BeadError::invalid(format!(
                "{cols}x{rows} cells at {s}px overflow the output image"
            ))),
        }
    }
}

/// Draw the grid as beads on a white background.
///
/// Each assigned cell becomes a filled circle one pixel short of the cell
/// edge, topped with a small highlight up and to the left. Empty cells
/// leave the background untouched. Optional grid lines go on last.
pub fn render(grid: &GridModel, params: &RenderParameters) -> Result<RgbaImage, BeadError> {
    params.validate()?;
    let (out_w, out_h) = params.output_size(grid.width(), grid.height())?;
    let mut canvas = RgbaImage::from_pixel(out_w, out_h, BACKGROUND);

    let cell = params.cell_pixel_size as f32;
    let radius = cell / 2.0 - 1.0;
    let shine_radius = radius / 3.0;

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Some(entry) = grid.entry(x, y) else {
                continue;
            };
            let rgb = entry.rgb();
            let bead = Rgba([rgb.red, rgb.green, rgb.blue, 255]);

            let cx = x as f32 * cell + cell / 2.0;
            let cy = y as f32 * cell + cell / 2.0;
            fill_circle(&mut canvas, cx, cy, radius, |_| bead);
            fill_circle(
                &mut canvas,
                cx - shine_radius,
                cy - shine_radius,
                shine_radius,
                shine,
            );
        }
    }
    log::trace!("drew {} beads", grid.assigned_count());

    if params.show_grid {
        draw_grid(
            &mut canvas,
            grid.width(),
            grid.height(),
            params.cell_pixel_size,
            params.grid_major_interval,
        );
    }

    Ok(canvas)
}

/// Paint every pixel whose center falls inside the circle.
fn fill_circle<F>(canvas: &mut RgbaImage, cx: f32, cy: f32, radius: f32, paint: F)
where
    F: Fn(Rgba<u8>) -> Rgba<u8>,
{
    if radius <= 0.0 {
        return;
    }
    let (w, h) = canvas.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w);
    let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h);
    let r2 = radius * radius;

    for py in y0..y1 {
        let dy = py as f32 + 0.5 - cy;
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                let pixel = canvas.get_pixel_mut(px, py);
                *pixel = paint(*pixel);
            }
        }
    }
}

fn shine(pixel: Rgba<u8>) -> Rgba<u8> {
    let base: Srgb<f32> = Srgb::new(pixel[0], pixel[1], pixel[2]).into_format();
    let lit: Srgb<u8> = base
        .mix(Srgb::new(1.0, 1.0, 1.0), SHINE_OPACITY)
        .into_format();
    Rgba([lit.red, lit.green, lit.blue, pixel[3]])
}

// ------------------------------------------------------------
// Grid lines
// ------------------------------------------------------------

/// Pixel span covered by a line of `weight` at boundary `p`, kept inside
/// `0..extent` so the outer boundaries stay visible.
fn line_span(p: u32, weight: u32, extent: u32) -> Range<u32> {
    let start = p
        .saturating_sub(weight / 2)
        .min(extent.saturating_sub(weight));
    start..(start + weight).min(extent)
}

fn vertical_line(canvas: &mut RgbaImage, p: u32, weight: u32, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    for px in line_span(p, weight, w) {
        for py in 0..h {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn horizontal_line(canvas: &mut RgbaImage, p: u32, weight: u32, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    for py in line_span(p, weight, h) {
        for px in 0..w {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Thin lines on every cell boundary except multiples of `interval`, then
/// heavy lines on those multiples. Verticals before horizontals in each
/// pass.
fn draw_grid(canvas: &mut RgbaImage, cols: u32, rows: u32, cell: u32, interval: u32) {
    let is_major = |i: u32| interval > 0 && i % interval == 0;

    for x in (0..=cols).filter(|&x| !is_major(x)) {
        vertical_line(canvas, x * cell, MINOR_WEIGHT, MINOR_LINE);
    }
    for y in (0..=rows).filter(|&y| !is_major(y)) {
        horizontal_line(canvas, y * cell, MINOR_WEIGHT, MINOR_LINE);
    }

    if interval > 0 {
        for x in (0..=cols).step_by(interval as usize) {
            vertical_line(canvas, x * cell, MAJOR_WEIGHT, MAJOR_LINE);
        }
        for y in (0..=rows).step_by(interval as usize) {
            horizontal_line(canvas, y * cell, MAJOR_WEIGHT, MAJOR_LINE);
        }
    }
    log::trace!("grid lines drawn for {cols}x{rows} cells, major every {interval}");
}
