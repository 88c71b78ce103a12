//! Color derivation for page theming
//!
//! Every page is themed from the dominant color of its album artwork. The
//! functions here turn that color into CSS strings. They are pure and total:
//! out-of-range input is clamped, never rejected.

pub mod extract;

pub use extract::dominant_color;

use serde::{Deserialize, Serialize};

/// Luminance below this is considered dark
pub const LUMINANCE_THRESHOLD: f64 = 0.46;

/// Channel delta applied to dark colors for the gradient end stop
pub const LIGHTEN_DELTA: i32 = 50;

/// Channel delta applied to light colors for the gradient end stop
pub const DARKEN_DELTA: i32 = -100;

/// An RGB color, serialized as a JSON array `[r, g, b]`
///
/// Deserialization accepts any JSON numbers and clamps each channel into
/// `0..=255`. A fourth (alpha) element is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[u8; 3]")]
pub struct ColorValue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorValue {
    pub const BLACK: ColorValue = ColorValue::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary channel values, clamping each to `0..=255`
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Parse a JSON-encoded color such as `"[30, 215, 96]"`
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

impl TryFrom<Vec<f64>> for ColorValue {
    type Error = String;

    fn try_from(channels: Vec<f64>) -> Result<Self, Self::Error> {
        match channels.as_slice() {
            [r, g, b] | [r, g, b, _] => Ok(Self::from_channels(*r, *g, *b)),
            other => Err(format!(
                "color must have 3 or 4 channels, got {}",
                other.len()
            )),
        }
    }
}

impl From<ColorValue> for [u8; 3] {
    fn from(color: ColorValue) -> Self {
        [color.r, color.g, color.b]
    }
}

/// `rgb(r, g, b)` CSS notation
pub fn to_rgb_string(color: ColorValue) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

/// Shift every channel by `delta`, saturating at `0` and `255`
pub fn adjust_color(color: ColorValue, delta: i32) -> ColorValue {
    let shift = |channel: u8| i32::from(channel).saturating_add(delta).clamp(0, 255) as u8;
    ColorValue::new(shift(color.r), shift(color.g), shift(color.b))
}

/// Perceptual luminance in `[0, 1]` (ITU-R BT.601 weights)
pub fn luminance(color: ColorValue) -> f64 {
    (0.299 * f64::from(color.r) + 0.587 * f64::from(color.g) + 0.114 * f64::from(color.b)) / 255.0
}

/// Delta used for the far end of a page gradient: dark colors are lightened,
/// light colors darkened.
pub fn contrast_delta(color: ColorValue) -> i32 {
    if luminance(color) < LUMINANCE_THRESHOLD {
        LIGHTEN_DELTA
    } else {
        DARKEN_DELTA
    }
}

/// Page background: a vertical gradient from the color to its contrast-adjusted
/// variant.
pub fn to_palette(color: ColorValue) -> String {
    let end = adjust_color(color, contrast_delta(color));
    format!(
        "linear-gradient(180deg, {} 0%, {} 100%)",
        to_rgb_string(color),
        to_rgb_string(end)
    )
}

/// Backdrop that fades the color out over the first 88% of the element
pub fn fade_to_transparent(color: ColorValue) -> String {
    format!(
        "linear-gradient(to bottom, {}, transparent 88%, transparent 100%)",
        to_rgb_string(color)
    )
}
