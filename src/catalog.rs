use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use palette::Srgb;

use crate::error::BeadError;

/// The generic 48-color bead set: `(id, display name, #RRGGBB)`.
///
/// `C23`/`C40` share `#E6E6FA` and `C24`/`C44` share `#4B0082`; lookups
/// resolve to `C23` and `C24` because they come first.
pub const STANDARD_BEADS: &[(&str, &str, &str)] = &[
    ("C01", "白色", "#FFFFFF"),
    ("C02", "黑色", "#000000"),
    ("C03", "灰色", "#808080"),
    ("C04", "深灰", "#404040"),
    ("C05", "浅灰", "#C0C0C0"),
    ("C06", "红色", "#FF0000"),
    ("C07", "深红", "#8B0000"),
    ("C08", "粉红", "#FFC0CB"),
    ("C09", "桃红", "#FF69B4"),
    ("C10", "橙色", "#FFA500"),
    ("C11", "深橙", "#FF8C00"),
    ("C12", "黄色", "#FFFF00"),
    ("C13", "柠檬黄", "#FFFACD"),
    ("C14", "金黄", "#FFD700"),
    ("C15", "绿色", "#008000"),
    ("C16", "深绿", "#006400"),
    ("C17", "草绿", "#7CFC00"),
    ("C18", "青色", "#00FFFF"),
    ("C19", "天蓝", "#87CEEB"),
    ("C20", "蓝色", "#0000FF"),
    ("C21", "深蓝", "#00008B"),
    ("C22", "紫色", "#800080"),
    ("C23", "浅紫", "#E6E6FA"),
    ("C24", "深紫", "#4B0082"),
    ("C25", "棕色", "#A52A2A"),
    ("C26", "巧克力", "#D2691E"),
    ("C27", "浅棕", "#DEB887"),
    ("C28", "米色", "#F5F5DC"),
    ("C29", "肉色", "#FFE4C4"),
    ("C30", "洋红", "#FF00FF"),
    ("C31", "青绿", "#00FF7F"),
    ("C32", "橄榄", "#808000"),
    ("C33", "藏青", "#000080"),
    ("C34", "蓝绿", "#008080"),
    ("C35", "栗色", "#800000"),
    ("C36", "紫罗兰", "#EE82EE"),
    ("C37", "番茄红", "#FF6347"),
    ("C38", "珊瑚色", "#FF7F50"),
    ("C39", "卡其色", "#F0E68C"),
    ("C40", "薰衣草", "#E6E6FA"),
    ("C41", "薄荷绿", "#98FB98"),
    ("C42", "深青", "#008B8B"),
    ("C43", "浅粉", "#FFB6C1"),
    ("C44", "靛蓝", "#4B0082"),
    ("C45", "象牙白", "#FFFFF0"),
    ("C46", "荧光绿", "#00FF00"),
    ("C47", "荧光粉", "#FF1493"),
    ("C48", "荧光橙", "#FF4500"),
];

/// One named bead color.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    id: String,
    display_name: String,
    rgb: Srgb<u8>,
}

impl PaletteEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, rgb: Srgb<u8>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            rgb,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn rgb(&self) -> Srgb<u8> {
        self.rgb
    }

    /// `#RRGGBB`, uppercase.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.rgb.red, self.rgb.green, self.rgb.blue)
    }
}

/// Parse a strict `#RRGGBB` string.
pub fn parse_hex(hex: &str) -> Result<Srgb<u8>, BeadError> {
    if hex.len() != 7 || !hex.starts_with('#') {
        return Err(BeadError::invalid(format!(
            "hex color {hex:?} must have the form #RRGGBB"
        )));
    }
    Srgb::<u8>::from_str(hex)
        .map_err(|e| BeadError::invalid(format!("hex color {hex:?}: {e}")))
}

/// A fixed, ordered bead palette.
///
/// Iteration order is significant: it decides ties in nearest-color
/// matching and in usage statistics. Cloning is cheap, the entries are
/// shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Arc<[PaletteEntry]>,
}

impl Palette {
    /// Build a palette, rejecting an empty list or a repeated id.
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, BeadError> {
        if entries.is_empty() {
            return Err(BeadError::invalid("palette cannot be empty"));
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(BeadError::invalid(format!(
                    "duplicate palette id {:?}",
                    entry.id
                )));
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Build a palette from `(id, display name, #RRGGBB)` rows.
    pub fn from_hex_table(table: &[(&str, &str, &str)]) -> Result<Self, BeadError> {
        let entries = table
            .iter()
            .map(|&(id, name, hex)| Ok(PaletteEntry::new(id, name, parse_hex(hex)?)))
            .collect::<Result<Vec<_>, BeadError>>()?;
        Self::new(entries)
    }

    /// The generic 48-color set in [`STANDARD_BEADS`].
    pub fn standard() -> Result<Self, BeadError> {
        Self::from_hex_table(STANDARD_BEADS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a palette built through `new`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    pub fn find(&self, id: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Index of the entry closest to `rgb` in plain RGB Euclidean distance,
    /// together with that distance.
    ///
    /// Squared distances are compared so the scan stays in integers; the
    /// first entry wins on a tie.
    pub fn nearest(&self, rgb: Srgb<u8>) -> (usize, f64) {
        let r = rgb.red as i32;
        let g = rgb.green as i32;
        let b = rgb.blue as i32;
        let mut best_idx = 0;
        let mut best_dist = i32::MAX;
        for (idx, entry) in self.entries.iter().enumerate() {
            let dr = r - entry.rgb.red as i32;
            let dg = g - entry.rgb.green as i32;
            let db = b - entry.rgb.blue as i32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        (best_idx, (best_dist as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_palette_parses_every_row() {
        let palette = Palette::standard().unwrap();
        assert_eq!(palette.len(), 48);
        assert_eq!(palette.get(0).unwrap().id(), "C01");
        assert_eq!(palette.find("C06").unwrap().rgb(), Srgb::new(255, 0, 0));
        assert_eq!(palette.find("C26").unwrap().hex(), "#D2691E");
    }

    #[test]
    fn rejects_empty_palette() {
        assert!(matches!(
            Palette::new(Vec::new()),
            Err(BeadError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Palette::from_hex_table(&[("A", "a", "#000000"), ("A", "b", "#FFFFFF")]);
        assert!(matches!(result, Err(BeadError::InvalidInput(_))));
    }

    #[test]
    fn duplicate_colors_are_allowed() {
        let palette = Palette::from_hex_table(&[("A", "a", "#E6E6FA"), ("B", "b", "#E6E6FA")]);
        assert_eq!(palette.unwrap().len(), 2);
    }

    #[test]
    fn parse_hex_requires_six_digits_and_hash() {
        assert_eq!(parse_hex("#0A0B0C").unwrap(), Srgb::new(10, 11, 12));
        assert!(parse_hex("0A0B0C").is_err());
        assert!(parse_hex("#FFF").is_err());
        assert!(parse_hex("#GG0000").is_err());
    }

    #[test]
    fn nearest_prefers_first_entry_on_tie() {
        let palette = Palette::standard().unwrap();
        let (idx, dist) = palette.nearest(Srgb::new(0xE6, 0xE6, 0xFA));
        assert_eq!(palette.get(idx).unwrap().id(), "C23");
        assert_eq!(dist, 0.0);

        let (idx, _) = palette.nearest(Srgb::new(0x4B, 0x00, 0x82));
        assert_eq!(palette.get(idx).unwrap().id(), "C24");
    }

    #[test]
    fn nearest_reports_euclidean_distance() {
        let palette = Palette::from_hex_table(&[("K", "black", "#000000")]).unwrap();
        let (_, dist) = palette.nearest(Srgb::new(3, 4, 0));
        assert_eq!(dist, 5.0);
    }
}
