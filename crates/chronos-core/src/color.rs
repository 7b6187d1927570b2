//! Deterministic category colours.
//!
//! A category's colour is a pure function of its name, so every view agrees
//! on it without storing anything. Hues are spread with the golden angle.

use serde::Serialize;

const GOLDEN_ANGLE: f64 = 137.508;

/// Light and dark theme colours for one category, as CSS `hsl()` strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryColor {
    pub hue: f64,
    pub bg: String,
    pub dark_bg: String,
    pub text: String,
    pub dark_text: String,
    pub border: String,
    pub dark_border: String,
    pub dot: String,
    pub dark_dot: String,
}

/// String hash over UTF-16 code units: `h = c + ((h << 5) - h)`.
///
/// The shift operates on the low 32 bits of `h` (wrapping) while the
/// subtraction and addition do not, so the accumulator is kept in `i64`.
fn category_hash(category: &str) -> i64 {
    category.encode_utf16().fold(0_i64, |hash, unit| {
        #[allow(clippy::cast_possible_truncation)]
        let shifted = (hash as i32).wrapping_shl(5);
        i64::from(unit) + (i64::from(shifted) - hash)
    })
}

/// Hue in degrees `[0, 360)` for a category.
#[allow(clippy::cast_precision_loss)]
pub fn category_hue(category: &str) -> f64 {
    (category_hash(category).unsigned_abs() as f64 * GOLDEN_ANGLE) % 360.0
}

/// Returns the colour set for a category, or `None` when there is no category.
pub fn category_color(category: &str) -> Option<CategoryColor> {
    if category.is_empty() {
        return None;
    }
    let hue = category_hue(category);
    Some(CategoryColor {
        hue,
        bg: format!("hsl({hue} 55% 93%)"),
        dark_bg: format!("hsla({hue} 60% 25% / 0.2)"),
        text: format!("hsl({hue} 65% 35%)"),
        dark_text: format!("hsl({hue} 70% 75%)"),
        border: format!("hsl({hue} 45% 82%)"),
        dark_border: format!("hsl({hue} 40% 25%)"),
        dot: format!("hsl({hue} 60% 50%)"),
        dark_dot: format!("hsl({hue} 65% 65%)"),
    })
}
