use image::{Rgba, Rgba32FImage, RgbaImage, imageops::FilterType};
use palette::Srgba;

use crate::error::BeadError;

/// One cell's color sample, alpha included.
pub type Sample = Srgba<u8>;

/// A `width × height` grid of samples in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    samples: Vec<Sample>,
}

impl SampleGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Sample> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get((y * self.width + x) as usize).copied()
    }
}

/// Upper bound on `width × height` cells for one grid.
pub const MAX_GRID_CELLS: u64 = 1 << 22;

/// Grid height for a target width, keeping the source aspect ratio.
///
/// `floor(width * src_h / src_w)`, never less than one row.
pub fn grid_height(target_width: u32, src_w: u32, src_h: u32) -> u32 {
    let h = (target_width as u64 * src_h as u64) / src_w.max(1) as u64;
    h.clamp(1, u32::MAX as u64) as u32
}

/// Resample `img` down (or up) to one sample per grid cell.
///
/// The target height follows from the aspect ratio. Resizing uses a
/// triangle filter, which averages over the covered area when shrinking.
/// Color is averaged with premultiplied alpha, so transparent pixels never
/// tint the visible ones next to them.
pub fn sample(img: &RgbaImage, target_width: u32) -> Result<SampleGrid, BeadError> {
    let (in_w, in_h) = img.dimensions();
    if target_width == 0 {
        return Err(BeadError::invalid("target width must be positive"));
    }
    if in_w == 0 || in_h == 0 {
        return Err(BeadError::invalid(format!(
            "source image has zero area ({in_w}x{in_h})"
        )));
    }

    let out_w = target_width;
    let out_h = grid_height(out_w, in_w, in_h);
    if out_w as u64 * out_h as u64 > MAX_GRID_CELLS {
        return Err(BeadError::invalid(format!(
            "{out_w}x{out_h} grid exceeds {MAX_GRID_CELLS} cells"
        )));
    }

    // Fast path – no scaling required.
    let samples = if out_w == in_w && out_h == in_h {
        img.pixels()
            .map(|p| Srgba::new(p[0], p[1], p[2], p[3]))
            .collect()
    } else {
        let resized =
            image::imageops::resize(&premultiply(img), out_w, out_h, FilterType::Triangle);
        resized.pixels().map(unpremultiply).collect()
    };

    log::debug!("sampled {in_w}x{in_h} source into {out_w}x{out_h} cells");

    Ok(SampleGrid {
        width: out_w,
        height: out_h,
        samples,
    })
}

fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn premultiply(img: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let a = p[3] as f32 / 255.0;
        Rgba([
            p[0] as f32 / 255.0 * a,
            p[1] as f32 / 255.0 * a,
            p[2] as f32 / 255.0 * a,
            a,
        ])
    })
}

fn unpremultiply(p: &Rgba<f32>) -> Sample {
    let a = p[3].clamp(0.0, 1.0);
    let alpha = unit_to_u8(a);
    if alpha == 0 {
        return Srgba::new(0, 0, 0, 0);
    }
    Srgba::new(
        unit_to_u8(p[0] / a),
        unit_to_u8(p[1] / a),
        unit_to_u8(p[2] / a),
        alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Palette;

    #[test]
    fn height_follows_aspect_ratio() {
        assert_eq!(grid_height(50, 200, 100), 25);
        assert_eq!(grid_height(3, 4, 5), 3);
        assert_eq!(grid_height(10, 1000, 1), 1);
    }

    #[test]
    fn rejects_zero_width_and_empty_image() {
        let img = RgbaImage::new(4, 4);
        assert!(matches!(sample(&img, 0), Err(BeadError::InvalidInput(_))));
        let empty = RgbaImage::new(0, 0);
        assert!(matches!(sample(&empty, 4), Err(BeadError::InvalidInput(_))));
    }

    #[test]
    fn same_size_keeps_pixels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let grid = sample(&img, 2).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 1));
        assert_eq!(grid.get(0, 0), Some(Srgba::new(255, 0, 0, 255)));
        assert_eq!(grid.get(1, 0), Some(Srgba::new(0, 0, 0, 255)));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn uniform_image_downscales_to_same_color() {
        let img = RgbaImage::from_pixel(40, 20, Rgba([10, 200, 30, 255]));
        let grid = sample(&img, 8).unwrap();
        assert_eq!((grid.width(), grid.height()), (8, 4));
        assert_eq!(grid.samples().len(), 32);
        assert!(grid.samples().iter().all(|s| *s == Srgba::new(10, 200, 30, 255)));
    }

    #[test]
    fn transparent_neighbours_do_not_darken_color() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let grid = sample(&img, 1).unwrap();
        let s = grid.get(0, 0).unwrap();
        assert!(s.red >= 254 && s.green >= 254 && s.blue >= 254, "{s:?}");
        assert!(s.alpha >= 127 && s.alpha <= 128, "{s:?}");

        let palette = Palette::standard().unwrap();
        let (idx, _) = palette.nearest(s.color);
        assert_eq!(palette.get(idx).unwrap().id(), "C01");
    }

    #[test]
    fn mostly_opaque_red_stays_red() {
        let mut img = RgbaImage::from_pixel(4, 1, Rgba([255, 0, 0, 255]));
        img.put_pixel(3, 0, Rgba([0, 0, 0, 0]));
        let grid = sample(&img, 1).unwrap();
        let s = grid.get(0, 0).unwrap();
        assert!(s.red >= 250, "{s:?}");
        assert!(s.green <= 2 && s.blue <= 2, "{s:?}");
        assert!(s.alpha > 128 && s.alpha < 255, "{s:?}");
    }

    #[test]
    fn fully_transparent_region_samples_as_clear() {
        let img = RgbaImage::from_pixel(6, 6, Rgba([90, 10, 200, 0]));
        let grid = sample(&img, 3).unwrap();
        assert!(grid.samples().iter().all(|s| *s == Srgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        assert!(matches!(sample(&img, 100_000), Err(BeadError::InvalidInput(_))));
        let strip = RgbaImage::from_pixel(1000, 1, Rgba([0, 0, 0, 255]));
        assert!(sample(&strip, 2048).is_ok());
    }
}
