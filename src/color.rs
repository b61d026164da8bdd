use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Prediction label → Color32
// ---------------------------------------------------------------------------

/// Assigns each prediction label in the table a distinct colour.
#[derive(Debug, Clone, Default)]
pub struct LabelColors {
    mapping: BTreeMap<String, Color32>,
}

impl LabelColors {
    pub fn new(labels: &[String]) -> Self {
        let mapping = labels
            .iter()
            .cloned()
            .zip(generate_palette(labels.len()))
            .collect();
        LabelColors { mapping }
    }

    /// Colour for `label`; unknown or missing labels are grey.
    pub fn color_for(&self, label: Option<&str>) -> Color32 {
        label
            .and_then(|l| self.mapping.get(l))
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_entries() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_labels_are_grey() {
        let colors = LabelColors::new(&["negative".to_string(), "positive".to_string()]);
        assert_ne!(colors.color_for(Some("positive")), Color32::GRAY);
        assert_eq!(colors.color_for(Some("neutral")), Color32::GRAY);
        assert_eq!(colors.color_for(None), Color32::GRAY);
    }
}
