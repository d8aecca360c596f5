use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, as
/// `#rrggbb` strings ready for a Plotly `marker.color`.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → colour
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column (sites, booster
/// categories) to stable colours, so a category keeps its colour whatever
/// subset is being plotted.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
    default_color: String,
}

impl ColorMap {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories: Vec<String> = categories
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        let palette = generate_palette(categories.len());
        let mapping = categories.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: "#7f7f7f".to_string(),
        }
    }

    /// Look up the colour for a category; unknown categories are grey.
    pub fn color_for(&self, category: &str) -> &str {
        self.mapping
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_hex_colours() {
        let colours = generate_palette(5);
        assert_eq!(colours.len(), 5);
        for c in &colours {
            assert_eq!(c.len(), 7);
            assert!(c.starts_with('#'));
        }
        let mut unique = colours.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn colours_are_stable_per_category() {
        let map = ColorMap::new(["B4", "B5", "FT", "v1.0", "v1.1"]);
        assert_eq!(map.color_for("FT"), map.color_for("FT"));
        assert_ne!(map.color_for("B4"), map.color_for("B5"));
        assert_eq!(map.color_for("Falcon Heavy"), "#7f7f7f");
    }
}
