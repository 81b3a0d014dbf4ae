//! Color harmonies derived from a base color by rotating its hue.
//!
//! Derived colors keep the base saturation and lightness (HSL); only the
//! monochromatic rule varies saturation and value instead of hue.

use crate::color::{
    hsl_to_rgb, hsl_to_rgb_unchecked, hsv_to_rgb_unchecked, rgb_to_hsl, rgb_to_hsv, Color, Hsl,
    Hsv,
};
use crate::error::ColorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of shades produced by [`HarmonyKind::Monochromatic`].
const MONOCHROMATIC_SHADES: usize = 4;

/// A harmony rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyKind {
    /// Hue + 180.
    Complementary,
    /// Hue − 30 and hue + 30.
    Analogous,
    /// Hue + 120 and hue + 240.
    Triadic,
    /// Hue + 150 and hue + 210.
    SplitComplementary,
    /// Square: hue + 90, + 180 and + 270.
    Tetradic,
    /// Same hue, four steps of HSV saturation and value.
    Monochromatic,
}

impl HarmonyKind {
    /// Every rule.
    pub const ALL: [HarmonyKind; 6] = [
        HarmonyKind::Complementary,
        HarmonyKind::Analogous,
        HarmonyKind::Triadic,
        HarmonyKind::SplitComplementary,
        HarmonyKind::Tetradic,
        HarmonyKind::Monochromatic,
    ];

    /// Kebab-case rule name.
    pub fn name(self) -> &'static str {
        match self {
            HarmonyKind::Complementary => "complementary",
            HarmonyKind::Analogous => "analogous",
            HarmonyKind::Triadic => "triadic",
            HarmonyKind::SplitComplementary => "split-complementary",
            HarmonyKind::Tetradic => "tetradic",
            HarmonyKind::Monochromatic => "monochromatic",
        }
    }

    /// Hue rotations in degrees for the hue-based rules; empty for monochromatic.
    pub fn hue_offsets(self) -> &'static [f64] {
        match self {
            HarmonyKind::Complementary => &[180.0],
            HarmonyKind::Analogous => &[-30.0, 30.0],
            HarmonyKind::Triadic => &[120.0, 240.0],
            HarmonyKind::SplitComplementary => &[150.0, 210.0],
            HarmonyKind::Tetradic => &[90.0, 180.0, 270.0],
            HarmonyKind::Monochromatic => &[],
        }
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HarmonyKind {
    type Err = ColorError;

    /// Accepts the kebab-case name, with `_` or `-` separators, plus `square`
    /// for tetradic. Unknown names yield `ColorError::UnsupportedHarmony`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if wanted == "square" {
            return Ok(HarmonyKind::Tetradic);
        }
        HarmonyKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ColorError::UnsupportedHarmony(s.to_string()))
    }
}

/// A base color and the colors a harmony rule derived from it, in rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyResult {
    pub base: Color,
    pub kind: HarmonyKind,
    pub colors: Vec<Color>,
}

/// Normalizes a hue angle to [0, 360).
fn normalize_hue(h: f64) -> f64 {
    let n = h.rem_euclid(360.0);
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// Derives the harmony of `base`. Derived colors inherit the base alpha.
pub fn harmony(base: Color, kind: HarmonyKind) -> HarmonyResult {
    let colors = match kind {
        HarmonyKind::Monochromatic => monochromatic(rgb_to_hsv(base)),
        _ => rotate(rgb_to_hsl(base), kind.hue_offsets()),
    };
    HarmonyResult {
        base,
        kind,
        colors: colors.into_iter().map(|c| c.with_alpha(base.a)).collect(),
    }
}

/// Derives the harmony of a base given in HSL.
///
/// Returns `ColorError::InvalidRange` if the HSL components are out of range.
pub fn harmony_hsl(base: Hsl, kind: HarmonyKind) -> Result<HarmonyResult, ColorError> {
    let base_color = hsl_to_rgb(base)?;
    let colors = match kind {
        HarmonyKind::Monochromatic => monochromatic(rgb_to_hsv(base_color)),
        _ => rotate(base, kind.hue_offsets()),
    };
    Ok(HarmonyResult {
        base: base_color,
        kind,
        colors,
    })
}

/// Derives a harmony by rule name; unknown names yield `UnsupportedHarmony`.
pub fn harmony_by_name(base: Color, kind: &str) -> Result<HarmonyResult, ColorError> {
    Ok(harmony(base, kind.parse()?))
}

/// `base` must already be in range; rotation keeps it there.
fn rotate(base: Hsl, offsets: &[f64]) -> Vec<Color> {
    offsets
        .iter()
        .map(|offset| {
            hsl_to_rgb_unchecked(Hsl {
                h: normalize_hue(base.h + offset),
                ..base
            })
        })
        .collect()
}

/// Scaling factors stay within [0, 1], so in-range input gives in-range shades.
fn monochromatic(base: Hsv) -> Vec<Color> {
    (0..MONOCHROMATIC_SHADES)
        .map(|i| {
            let f = (i + 1) as f64 / (MONOCHROMATIC_SHADES + 1) as f64;
            hsv_to_rgb_unchecked(Hsv {
                h: base.h,
                s: base.s * (0.3 + 0.7 * f),
                v: base.v * (0.4 + 0.6 * f),
            })
        })
        .collect()
}
