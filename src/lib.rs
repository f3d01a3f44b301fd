use wasm_bindgen::prelude::*;
use image::{ImageFormat, RgbaImage};
use js_sys::{Array, Object, Reflect, Uint8Array};

pub mod catalog;
pub mod error;
pub mod grid;
pub mod locate;
pub mod quantize;
pub mod render;
pub mod sampler;
pub mod stats;

pub use catalog::{Palette, PaletteEntry, STANDARD_BEADS};
pub use error::BeadError;
pub use grid::{GridModel, build_grid};
pub use locate::{cell_at, locate};
pub use quantize::{ALPHA_THRESHOLD, GridCell, quantize};
pub use render::{RenderParameters, render};
pub use sampler::{Sample, SampleGrid, sample};
pub use stats::{UsageStat, aggregate};

// ------------------------------------------------------------
// Byte-level glue: decoding uploads, encoding the finished pattern
// ------------------------------------------------------------

/// Decode any supported image format into an RGBA buffer.
pub fn decode_rgba(input: &[u8]) -> Result<RgbaImage, BeadError> {
    let img = image::load_from_memory(input).map_err(BeadError::Decode)?;
    Ok(img.to_rgba8())
}

/// PNG-encode a rendered pattern.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, BeadError> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(BeadError::Encode)?;
    }
    Ok(buf)
}

fn js_err(err: BeadError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn entry_object(entry: &PaletteEntry) -> Result<Object, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(entry.id()))?;
    Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(entry.display_name()))?;
    Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&entry.hex()))?;
    Ok(obj)
}

/// One generated bead pattern, held by the page between interactions.
///
/// Built once per uploaded image and width. Changing the bead size or grid
/// options only re-renders; a new image or width means a new pattern
/// replacing this one.
#[wasm_bindgen]
pub struct BeadPattern {
    grid: GridModel,
}

#[wasm_bindgen]
impl BeadPattern {
    /// Decode `input` and quantize it to `width` beads across using the
    /// standard 48-color set.
    #[wasm_bindgen(constructor)]
    pub fn new(input: Vec<u8>, width: u32) -> Result<BeadPattern, JsValue> {
        let palette = Palette::standard().map_err(js_err)?;
        let img = decode_rgba(&input).map_err(js_err)?;
        let grid = build_grid(&img, width, &palette).map_err(js_err)?;
        Ok(BeadPattern { grid })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Render the beads and return the PNG bytes.
    pub fn render(
        &self,
        cell_size: u32,
        show_grid: bool,
        grid_interval: u32,
    ) -> Result<Uint8Array, JsValue> {
        let params = RenderParameters {
            cell_pixel_size: cell_size,
            show_grid,
            grid_major_interval: grid_interval,
        };
        let img = render(&self.grid, &params).map_err(js_err)?;
        let encoded = encode_png(&img).map_err(js_err)?;
        Ok(Uint8Array::from(encoded.as_slice()))
    }

    /// Bead counts as `[{id, name, hex, count}]`, most used first.
    pub fn stats(&self) -> Result<Array, JsValue> {
        let out = Array::new();
        for stat in aggregate(&self.grid) {
            let obj = entry_object(stat.entry)?;
            Reflect::set(&obj, &JsValue::from_str("count"), &JsValue::from(stat.count))?;
            out.push(&obj);
        }
        Ok(out)
    }

    /// `{id, name, hex}` of the bead under a rendered-image pixel, or `null`.
    pub fn locate(&self, x: f64, y: f64, cell_size: u32) -> Result<JsValue, JsValue> {
        match locate(x, y, cell_size, &self.grid) {
            Some(entry) => Ok(entry_object(entry)?.into()),
            None => Ok(JsValue::NULL),
        }
    }
}

/// Native counterpart of [`BeadPattern`]: decode, quantize and render in
/// one pass. Returns the PNG bytes together with the grid so callers can
/// derive statistics from the same pass.
#[cfg(not(target_arch = "wasm32"))]
pub fn pattern_bytes(
    input: &[u8],
    width: u32,
    palette: &Palette,
    params: &RenderParameters,
) -> Result<(Vec<u8>, GridModel), BeadError> {
    let img = decode_rgba(input)?;
    let grid = build_grid(&img, width, palette)?;
    let rendered = render(&grid, params)?;
    let png = encode_png(&rendered)?;
    Ok((png, grid))
}
