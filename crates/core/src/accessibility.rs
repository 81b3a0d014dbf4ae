//! WCAG relative luminance, contrast ratio and compliance classification.
//!
//! Thresholds follow WCAG 2.x: AA requires 4.5:1 for normal text and 3:1 for
//! large text, AAA requires 7:1 and 4.5:1 respectively.

use crate::color::{hsl_to_rgb, rgb_to_hsl, rgb_to_linear, Color, Hsl};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance level reached by a contrast ratio for one text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    #[serde(rename = "Fail")]
    Fail,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WcagLevel::Fail => "Fail",
            WcagLevel::Aa => "AA",
            WcagLevel::Aaa => "AAA",
        })
    }
}

/// Text size category; WCAG relaxes thresholds for large text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Normal,
    Large,
}

/// Minimum contrast ratio needed for `level` at `size`. `Fail` needs nothing.
pub fn wcag_threshold(level: WcagLevel, size: TextSize) -> f64 {
    match (level, size) {
        (WcagLevel::Fail, _) => 1.0,
        (WcagLevel::Aa, TextSize::Normal) => 4.5,
        (WcagLevel::Aa, TextSize::Large) => 3.0,
        (WcagLevel::Aaa, TextSize::Normal) => 7.0,
        (WcagLevel::Aaa, TextSize::Large) => 4.5,
    }
}

/// Classifies a contrast ratio for one text size.
pub fn wcag_level(ratio: f64, size: TextSize) -> WcagLevel {
    if ratio >= wcag_threshold(WcagLevel::Aaa, size) {
        WcagLevel::Aaa
    } else if ratio >= wcag_threshold(WcagLevel::Aa, size) {
        WcagLevel::Aa
    } else {
        WcagLevel::Fail
    }
}

/// WCAG relative luminance in [0, 1] from gamma-decoded channels. Alpha is ignored.
pub fn relative_luminance(c: Color) -> f64 {
    let lin = rgb_to_linear(c);
    0.2126 * lin.r + 0.7152 * lin.g + 0.0722 * lin.b
}

/// Contrast ratio in [1, 21]; symmetric in its arguments.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast between a foreground and background color with WCAG pass/fail flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub foreground: Color,
    pub background: Color,
    pub ratio: f64,
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
}

impl AccessibilityReport {
    /// Computes the report for a color pair.
    pub fn new(foreground: Color, background: Color) -> Self {
        let ratio = contrast_ratio(foreground, background);
        let passes = |level, size| ratio >= wcag_threshold(level, size);
        Self {
            foreground,
            background,
            ratio,
            aa_normal: passes(WcagLevel::Aa, TextSize::Normal),
            aa_large: passes(WcagLevel::Aa, TextSize::Large),
            aaa_normal: passes(WcagLevel::Aaa, TextSize::Normal),
            aaa_large: passes(WcagLevel::Aaa, TextSize::Large),
        }
    }

    /// Level reached for normal-size text.
    pub fn normal_text_level(&self) -> WcagLevel {
        wcag_level(self.ratio, TextSize::Normal)
    }

    /// Level reached for large text.
    pub fn large_text_level(&self) -> WcagLevel {
        wcag_level(self.ratio, TextSize::Large)
    }
}

/// Black or white, whichever contrasts more with `background` (white wins ties).
pub fn readable_text_color(background: Color) -> Color {
    if contrast_ratio(background, Color::WHITE) >= contrast_ratio(background, Color::BLACK) {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

/// Lightness offsets tried by [`suggest_accessible_colors`], lighter first.
const LIGHTNESS_STEPS: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];
/// Upper bound on suggestions returned.
const MAX_SUGGESTIONS: usize = 5;

/// Suggests variants of `base` that reach `level` for `size` against `background`.
///
/// Variants keep the base hue and saturation and shift HSL lightness by
/// ±0.1 … ±0.5 (lighter variants first). Duplicates are dropped and at most
/// five colors are returned; the list is empty when no step is sufficient.
pub fn suggest_accessible_colors(
    base: Color,
    background: Color,
    level: WcagLevel,
    size: TextSize,
) -> Vec<Color> {
    let target = wcag_threshold(level, size);
    let Hsl { h, s, l } = rgb_to_hsl(base);
    let lighter = LIGHTNESS_STEPS.iter().map(|d| (l + d).min(1.0));
    let darker = LIGHTNESS_STEPS.iter().map(|d| (l - d).max(0.0));

    let mut suggestions: Vec<Color> = Vec::new();
    for lightness in lighter.chain(darker) {
        let Ok(candidate) = hsl_to_rgb(Hsl { h, s, l: lightness }) else {
            continue;
        };
        if contrast_ratio(candidate, background) >= target && !suggestions.contains(&candidate) {
            suggestions.push(candidate);
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}
