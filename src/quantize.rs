use crate::catalog::Palette;
use crate::sampler::Sample;

/// Samples with alpha below this are treated as see-through.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Classification of one grid cell.
///
/// `Assigned` holds the index of a palette entry, never a color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCell {
    Empty,
    Assigned(usize),
}

impl GridCell {
    pub fn index(self) -> Option<usize> {
        match self {
            GridCell::Empty => None,
            GridCell::Assigned(idx) => Some(idx),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, GridCell::Empty)
    }
}

/// Map one sample onto the palette.
///
/// Mostly transparent samples become `Empty`; everything else is assigned
/// to the nearest entry in RGB space, alpha ignored.
pub fn quantize(sample: Sample, palette: &Palette) -> GridCell {
    if sample.alpha < ALPHA_THRESHOLD {
        return GridCell::Empty;
    }
    let (idx, _) = palette.nearest(sample.color);
    GridCell::Assigned(idx)
}
