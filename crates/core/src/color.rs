//! The `Color` value type and conversions between color models.
//!
//! `Color` stores three 8-bit sRGB channels and an optional 8-bit alpha. Every
//! other model (HEX, HSL, HSV, CMYK, XYZ, LAB) is a derived view computed on
//! demand by the pure conversion functions in this module.
//!
//! Round-trip guarantees:
//! - HEX, HSL and HSV are lossless: `hsl_to_rgb(rgb_to_hsl(c)) == c` for every
//!   RGB triple.
//! - CMYK, XYZ and LAB are lossy. Results are rounded back to 8 bits and
//!   out-of-gamut values saturate per channel, so a round trip may move a
//!   channel by one unit.
//!
//! Hue convention: hue is reported as `0.0` whenever saturation is zero
//! (greys, black and white), because the hue angle is undefined there.

use crate::error::ColorError;
use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CIE XYZ tristimulus values of the D65 reference white (Y normalized to 1).
pub const D65_WHITE: DVec3 = DVec3::new(0.95047, 1.0, 1.08883);

/// Linear sRGB to XYZ (D65). Columns are the contributions of R, G and B.
pub const SRGB_TO_XYZ: DMat3 = DMat3::from_cols(
    DVec3::new(0.4124564, 0.2126729, 0.0193339),
    DVec3::new(0.3575761, 0.7151522, 0.1191920),
    DVec3::new(0.1804375, 0.0721750, 0.9503041),
);

/// XYZ (D65) to linear sRGB, the inverse of [`SRGB_TO_XYZ`].
pub const XYZ_TO_SRGB: DMat3 = DMat3::from_cols(
    DVec3::new(3.2404542, -0.9692660, 0.0556434),
    DVec3::new(-1.5371385, 1.8760108, -0.2040259),
    DVec3::new(-0.4985314, 0.0415560, 1.0572252),
);

/// CIE LAB epsilon (216 / 24389).
const LAB_EPSILON: f64 = 216.0 / 24389.0;
/// CIE LAB kappa (24389 / 27).
const LAB_KAPPA: f64 = 24389.0 / 27.0;

/// An sRGB color with 8-bit channels and optional 8-bit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<u8>,
}

/// Linear RGB color (gamma-decoded), components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Process-free CMYK, all components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

/// CIE XYZ relative to D65, with Y = 1.0 for reference white.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b* relative to D65. `l` is in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// The color models a [`Color`] can be viewed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModel {
    Rgb,
    Hex,
    Hsl,
    Hsv,
    Cmyk,
    Xyz,
    Lab,
}

impl ColorModel {
    /// Every model, in display order.
    pub const ALL: [ColorModel; 7] = [
        ColorModel::Hex,
        ColorModel::Rgb,
        ColorModel::Hsl,
        ColorModel::Hsv,
        ColorModel::Cmyk,
        ColorModel::Xyz,
        ColorModel::Lab,
    ];

    /// Lowercase model name.
    pub fn name(self) -> &'static str {
        match self {
            ColorModel::Rgb => "rgb",
            ColorModel::Hex => "hex",
            ColorModel::Hsl => "hsl",
            ColorModel::Hsv => "hsv",
            ColorModel::Cmyk => "cmyk",
            ColorModel::Xyz => "xyz",
            ColorModel::Lab => "lab",
        }
    }
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Creates a color without an alpha channel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Creates a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Creates a color from wide integer channels, rejecting anything outside 0–255.
    pub fn from_channels(r: i64, g: i64, b: i64) -> Result<Self, ColorError> {
        Ok(Self::rgb(
            checked_channel("red", r)?,
            checked_channel("green", g)?,
            checked_channel("blue", b)?,
        ))
    }

    /// Creates a color from unit-range floats in [0, 1].
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        check_unit("red", r)?;
        check_unit("green", g)?;
        check_unit("blue", b)?;
        Ok(Self::rgb(
            unit_to_channel(r),
            unit_to_channel(g),
            unit_to_channel(b),
        ))
    }

    /// Returns a copy with the alpha channel replaced.
    pub fn with_alpha(self, a: Option<u8>) -> Self {
        Self { a, ..self }
    }

    /// Alpha as stored, treating a missing channel as fully opaque.
    pub fn alpha_or_opaque(self) -> u8 {
        self.a.unwrap_or(255)
    }

    /// Red, green and blue scaled to [0, 1].
    pub fn to_unit(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (hex digits in either case).
    ///
    /// Returns `ColorError::FormatError` for anything else, including a
    /// missing `#`, surrounding whitespace or a 4-digit form.
    pub fn from_hex(hex: &str) -> Result<Color, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError::FormatError(format!("'{hex}' does not start with '#'")))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::FormatError(format!(
                "'{hex}' contains non-hex characters"
            )));
        }
        let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        let parsed = match digits.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|n| n * 17);
                (nibble(0), nibble(1), nibble(2), None)
            }
            6 => (pair(0), pair(2), pair(4), None),
            8 => (pair(0), pair(2), pair(4), Some(pair(6))),
            n => {
                return Err(ColorError::FormatError(format!(
                    "expected 3, 6 or 8 hex digits, got {n}"
                )))
            }
        };
        let invalid = |e: std::num::ParseIntError| ColorError::FormatError(format!("'{hex}': {e}"));
        Ok(Color {
            r: parsed.0.map_err(invalid)?,
            g: parsed.1.map_err(invalid)?,
            b: parsed.2.map_err(invalid)?,
            a: parsed.3.transpose().map_err(invalid)?,
        })
    }

    /// Formats the color as `#RRGGBB`, or `#RRGGBBAA` when alpha is present.
    pub fn to_hex(self) -> String {
        match self.a {
            Some(a) => format!("#{:02X}{:02X}{:02X}{a:02X}", self.r, self.g, self.b),
            None => format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
        }
    }

    /// Formats the color in the given model using percentage display
    /// conventions (e.g. `hsl(210.0, 50.0%, 40.0%)`).
    pub fn format(self, model: ColorModel) -> String {
        match model {
            ColorModel::Hex => self.to_hex(),
            ColorModel::Rgb => match self.a {
                Some(a) => format!(
                    "rgba({}, {}, {}, {})",
                    self.r,
                    self.g,
                    self.b,
                    format_alpha(a)
                ),
                None => format!("rgb({}, {}, {})", self.r, self.g, self.b),
            },
            ColorModel::Hsl => {
                let Hsl { h, s, l } = rgb_to_hsl(self);
                format!("hsl({h:.1}, {:.1}%, {:.1}%)", s * 100.0, l * 100.0)
            }
            ColorModel::Hsv => {
                let Hsv { h, s, v } = rgb_to_hsv(self);
                format!("hsv({h:.1}, {:.1}%, {:.1}%)", s * 100.0, v * 100.0)
            }
            ColorModel::Cmyk => {
                let Cmyk { c, m, y, k } = rgb_to_cmyk(self);
                format!(
                    "cmyk({:.1}%, {:.1}%, {:.1}%, {:.1}%)",
                    c * 100.0,
                    m * 100.0,
                    y * 100.0,
                    k * 100.0
                )
            }
            ColorModel::Xyz => {
                let Xyz { x, y, z } = rgb_to_xyz(self);
                format!("xyz({x:.4}, {y:.4}, {z:.4})")
            }
            ColorModel::Lab => {
                let Lab { l, a, b } = rgb_to_lab(self);
                format!("lab({l:.2}, {a:.2}, {b:.2})")
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

/// Formats an 8-bit alpha as a CSS-style fraction with at most three decimals.
pub fn format_alpha(a: u8) -> String {
    let text = format!("{:.3}", a as f64 / 255.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn checked_channel(what: &'static str, value: i64) -> Result<u8, ColorError> {
    u8::try_from(value).map_err(|_| ColorError::range(what, value as f64))
}

fn check_unit(what: &'static str, value: f64) -> Result<(), ColorError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::range(what, value))
    }
}

fn check_hue(h: f64) -> Result<(), ColorError> {
    if h.is_finite() && (0.0..360.0).contains(&h) {
        Ok(())
    } else {
        Err(ColorError::range("hue", h))
    }
}

/// Scales a unit value to a channel, saturating instead of wrapping.
pub(crate) fn unit_to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
pub fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
pub fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

impl LinearRgb {
    /// Packs the components into a vector for matrix transforms.
    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.r, self.g, self.b)
    }

    /// Unpacks a vector produced by a matrix transform.
    pub fn from_vec3(v: DVec3) -> Self {
        Self {
            r: v.x,
            g: v.y,
            b: v.z,
        }
    }
}

/// Converts a color to linear RGB by applying inverse sRGB gamma.
pub fn rgb_to_linear(c: Color) -> LinearRgb {
    let [r, g, b] = c.to_unit();
    LinearRgb {
        r: srgb_component_to_linear(r),
        g: srgb_component_to_linear(g),
        b: srgb_component_to_linear(b),
    }
}

/// Converts linear RGB back to an 8-bit color, saturating out-of-gamut
/// components into [0, 255]. The result has no alpha.
pub fn linear_to_rgb(c: LinearRgb) -> Color {
    let encode = |v: f64| unit_to_channel(linear_component_to_srgb(v.clamp(0.0, 1.0)));
    Color::rgb(encode(c.r), encode(c.g), encode(c.b))
}

/// Hue in degrees for unit RGB, with the achromatic convention (0 when max == min).
fn hue_of(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let h = sector * 60.0;
    if h >= 360.0 {
        h - 360.0
    } else {
        h
    }
}

/// Builds unit RGB from chroma, the intermediate component and the lightness offset.
fn from_chroma(h: f64, c: f64, m: f64) -> [f64; 3] {
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// Converts a color to HSL. Alpha is ignored.
pub fn rgb_to_hsl(c: Color) -> Hsl {
    let [r, g, b] = c.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h: hue_of(r, g, b, max, delta),
        s: s.min(1.0),
        l,
    }
}

/// Converts HSL to an opaque color.
///
/// Returns `ColorError::InvalidRange` if hue is outside [0, 360) or
/// saturation/lightness outside [0, 1].
pub fn hsl_to_rgb(hsl: Hsl) -> Result<Color, ColorError> {
    check_hue(hsl.h)?;
    check_unit("saturation", hsl.s)?;
    check_unit("lightness", hsl.l)?;
    Ok(hsl_to_rgb_unchecked(hsl))
}

/// [`hsl_to_rgb`] for components the caller already keeps in range.
pub(crate) fn hsl_to_rgb_unchecked(hsl: Hsl) -> Color {
    let c = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
    let [r, g, b] = from_chroma(hsl.h, c, hsl.l - c / 2.0);
    Color::rgb(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
}

/// Converts a color to HSV. Alpha is ignored.
pub fn rgb_to_hsv(c: Color) -> Hsv {
    let [r, g, b] = c.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    Hsv {
        h: hue_of(r, g, b, max, delta),
        s,
        v: max,
    }
}

/// Converts HSV to an opaque color.
///
/// Returns `ColorError::InvalidRange` if hue is outside [0, 360) or
/// saturation/value outside [0, 1].
pub fn hsv_to_rgb(hsv: Hsv) -> Result<Color, ColorError> {
    check_hue(hsv.h)?;
    check_unit("saturation", hsv.s)?;
    check_unit("value", hsv.v)?;
    Ok(hsv_to_rgb_unchecked(hsv))
}

pub(crate) fn hsv_to_rgb_unchecked(hsv: Hsv) -> Color {
    let c = hsv.v * hsv.s;
    let [r, g, b] = from_chroma(hsv.h, c, hsv.v - c);
    Color::rgb(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
}

/// Converts a color to CMYK.
///
/// Pure black maps to `(0, 0, 0, 1)`: with K = 1 the CMY denominators vanish.
pub fn rgb_to_cmyk(c: Color) -> Cmyk {
    let [r, g, b] = c.to_unit();
    let k = 1.0 - r.max(g).max(b);
    if k >= 1.0 {
        return Cmyk {
            c: 0.0,
            m: 0.0,
            y: 0.0,
            k: 1.0,
        };
    }
    Cmyk {
        c: (1.0 - r - k) / (1.0 - k),
        m: (1.0 - g - k) / (1.0 - k),
        y: (1.0 - b - k) / (1.0 - k),
        k,
    }
}

/// Converts CMYK to an opaque color. Lossy: channels are rounded to 8 bits.
///
/// Returns `ColorError::InvalidRange` if any component is outside [0, 1].
pub fn cmyk_to_rgb(cmyk: Cmyk) -> Result<Color, ColorError> {
    check_unit("cyan", cmyk.c)?;
    check_unit("magenta", cmyk.m)?;
    check_unit("yellow", cmyk.y)?;
    check_unit("key", cmyk.k)?;
    let channel = |ink: f64| unit_to_channel((1.0 - ink) * (1.0 - cmyk.k));
    Ok(Color::rgb(
        channel(cmyk.c),
        channel(cmyk.m),
        channel(cmyk.y),
    ))
}

/// Converts linear RGB to XYZ (D65).
pub fn linear_to_xyz(c: LinearRgb) -> Xyz {
    let v = SRGB_TO_XYZ * c.to_vec3();
    Xyz {
        x: v.x,
        y: v.y,
        z: v.z,
    }
}

/// Converts XYZ (D65) to linear RGB. The result may be out of gamut.
pub fn xyz_to_linear(c: Xyz) -> LinearRgb {
    LinearRgb::from_vec3(XYZ_TO_SRGB * DVec3::new(c.x, c.y, c.z))
}

/// Converts a color to XYZ (D65).
pub fn rgb_to_xyz(c: Color) -> Xyz {
    linear_to_xyz(rgb_to_linear(c))
}

/// Converts XYZ to an opaque color, saturating out-of-gamut channels.
///
/// Returns `ColorError::InvalidRange` for negative or non-finite components.
pub fn xyz_to_rgb(c: Xyz) -> Result<Color, ColorError> {
    for (what, v) in [("x", c.x), ("y", c.y), ("z", c.z)] {
        if !v.is_finite() || v < 0.0 {
            return Err(ColorError::range(what, v));
        }
    }
    Ok(linear_to_rgb(xyz_to_linear(c)))
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (116.0 * f - 16.0) / LAB_KAPPA
    }
}

/// Converts XYZ (D65) to CIE LAB.
pub fn xyz_to_lab(c: Xyz) -> Lab {
    let fx = lab_f(c.x / D65_WHITE.x);
    let fy = lab_f(c.y / D65_WHITE.y);
    let fz = lab_f(c.z / D65_WHITE.z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts CIE LAB to XYZ (D65).
pub fn lab_to_xyz(c: Lab) -> Xyz {
    let fy = (c.l + 16.0) / 116.0;
    let fx = fy + c.a / 500.0;
    let fz = fy - c.b / 200.0;
    let yr = if c.l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        c.l / LAB_KAPPA
    };
    Xyz {
        x: lab_f_inv(fx) * D65_WHITE.x,
        y: yr * D65_WHITE.y,
        z: lab_f_inv(fz) * D65_WHITE.z,
    }
}

/// Converts a color to CIE LAB via sRGB -> linear -> XYZ -> LAB.
pub fn rgb_to_lab(c: Color) -> Lab {
    xyz_to_lab(rgb_to_xyz(c))
}

/// Converts CIE LAB to an opaque color, saturating out-of-gamut channels.
///
/// Returns `ColorError::InvalidRange` if L is outside [0, 100] or a/b are not
/// finite.
pub fn lab_to_rgb(c: Lab) -> Result<Color, ColorError> {
    if !c.l.is_finite() || !(0.0..=100.0).contains(&c.l) {
        return Err(ColorError::range("lightness", c.l));
    }
    if !c.a.is_finite() {
        return Err(ColorError::range("a", c.a));
    }
    if !c.b.is_finite() {
        return Err(ColorError::range("b", c.b));
    }
    Ok(linear_to_rgb(xyz_to_linear(lab_to_xyz(c))))
}

impl Lab {
    /// CIE76 color difference (Euclidean distance in LAB).
    pub fn delta_e(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// CIE76 color difference between two colors.
pub fn delta_e(a: Color, b: Color) -> f64 {
    rgb_to_lab(a).delta_e(rgb_to_lab(b))
}

/// Blends two colors channel-wise; `ratio` 0 yields `a`, 1 yields `b`.
///
/// The ratio is clamped to [0, 1] (NaN counts as 0). Alpha is blended when
/// either side carries one, treating a missing alpha as opaque.
pub fn blend(a: Color, b: Color, ratio: f64) -> Color {
    let t = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    let alpha = match (a.a, b.a) {
        (None, None) => None,
        _ => Some(mix(a.alpha_or_opaque(), b.alpha_or_opaque())),
    };
    Color {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: alpha,
    }
}

/// `steps` intermediate blends from `a` to `b`, with both ends included.
pub fn gradient(a: Color, b: Color, steps: usize) -> Vec<Color> {
    let n = steps + 1;
    (0..=n).map(|i| blend(a, b, i as f64 / n as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- HEX --

    #[test]
    fn to_hex_is_uppercase() {
        assert_eq!(Color::rgb(0xc0, 0xff, 0xee).to_hex(), "#C0FFEE");
    }

    #[test]
    fn to_hex_appends_alpha_when_present() {
        assert_eq!(Color::rgba(255, 0, 0, 0x80).to_hex(), "#FF000080");
    }

    #[test]
    fn from_hex_expands_shorthand() {
        assert_eq!(Color::from_hex("#F0A").unwrap(), Color::rgb(0xff, 0x00, 0xaa));
    }

    #[test]
    fn from_hex_parses_alpha() {
        let c = Color::from_hex("#11223344").unwrap();
        assert_eq!(c, Color::rgba(0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn from_hex_accepts_lowercase_input() {
        assert_eq!(
            Color::from_hex("#c0ffee").unwrap(),
            Color::from_hex("#C0FFEE").unwrap()
        );
    }

    #[test]
    fn from_hex_rejects_bad_grammar() {
        for bad in ["C0FFEE", "#C0FFE", "#GGGGGG", "", "#", " #FFFFFF", "#FFFF", "#+1+2+3"] {
            assert!(
                matches!(Color::from_hex(bad), Err(ColorError::FormatError(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn display_and_from_str_agree() {
        let c: Color = "#123456".parse().unwrap();
        assert_eq!(c.to_string(), "#123456");
    }

    #[test]
    fn from_channels_rejects_out_of_range() {
        assert!(Color::from_channels(0, 128, 255).is_ok());
        assert!(matches!(
            Color::from_channels(256, 0, 0),
            Err(ColorError::InvalidRange { what: "red", .. })
        ));
        assert!(Color::from_channels(0, -1, 0).is_err());
    }

    #[test]
    fn from_unit_rgb_rejects_out_of_range_and_nan() {
        assert_eq!(Color::from_unit_rgb(1.0, 0.0, 0.5).unwrap(), Color::rgb(255, 0, 128));
        assert!(Color::from_unit_rgb(1.1, 0.0, 0.0).is_err());
        assert!(Color::from_unit_rgb(f64::NAN, 0.0, 0.0).is_err());
    }

    // -- gamma --

    #[test]
    fn srgb_gamma_boundary_at_0_04045() {
        assert!(approx_eq(srgb_component_to_linear(0.04045), 0.04045 / 12.92));
        let expected = ((0.04046 + 0.055) / 1.055_f64).powf(2.4);
        assert!(approx_eq(srgb_component_to_linear(0.04046), expected));
    }

    #[test]
    fn linear_to_srgb_boundary_at_0_0031308() {
        assert!(approx_eq(linear_component_to_srgb(0.0031308), 0.0031308 * 12.92));
        let expected = 1.055 * 0.0031309_f64.powf(1.0 / 2.4) - 0.055;
        assert!(approx_eq(linear_component_to_srgb(0.0031309), expected));
    }

    #[test]
    fn linear_to_rgb_saturates_instead_of_wrapping() {
        let c = linear_to_rgb(LinearRgb {
            r: 1.7,
            g: -0.4,
            b: 0.5,
        });
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 0);
    }

    // -- HSL / HSV --

    #[test]
    fn pure_red_hsl() {
        let hsl = rgb_to_hsl(Color::rgb(255, 0, 0));
        assert!(approx_eq(hsl.h, 0.0));
        assert!(approx_eq(hsl.s, 1.0));
        assert!(approx_eq(hsl.l, 0.5));
    }

    #[test]
    fn achromatic_colors_have_zero_hue() {
        for v in [0u8, 77, 128, 255] {
            let hsl = rgb_to_hsl(Color::rgb(v, v, v));
            let hsv = rgb_to_hsv(Color::rgb(v, v, v));
            assert_eq!(hsl.h, 0.0);
            assert_eq!(hsl.s, 0.0);
            assert_eq!(hsv.h, 0.0);
            assert_eq!(hsv.s, 0.0);
        }
    }

    #[test]
    fn hsl_known_values() {
        let hsl = rgb_to_hsl(Color::rgb(0x33, 0x66, 0x99));
        assert!(approx_eq(hsl.h, 210.0), "h = {}", hsl.h);
        assert!(approx_eq(hsl.s, 0.5), "s = {}", hsl.s);
        assert!(approx_eq(hsl.l, 0.4), "l = {}", hsl.l);
    }

    #[test]
    fn hsv_known_values() {
        let hsv = rgb_to_hsv(Color::rgb(0, 255, 255));
        assert!(approx_eq(hsv.h, 180.0));
        assert!(approx_eq(hsv.s, 1.0));
        assert!(approx_eq(hsv.v, 1.0));
    }

    #[test]
    fn hue_just_below_red_stays_below_360() {
        let hsl = rgb_to_hsl(Color::rgb(255, 0, 1));
        assert!(hsl.h < 360.0 && hsl.h > 359.0, "h = {}", hsl.h);
    }

    #[test]
    fn hsl_to_rgb_rejects_hue_360() {
        let err = hsl_to_rgb(Hsl {
            h: 360.0,
            s: 0.5,
            l: 0.5,
        });
        assert!(matches!(err, Err(ColorError::InvalidRange { what: "hue", .. })));
    }

    #[test]
    fn hsv_to_rgb_rejects_saturation_above_one() {
        assert!(hsv_to_rgb(Hsv {
            h: 10.0,
            s: 1.01,
            v: 0.5
        })
        .is_err());
    }

    // -- CMYK --

    #[test]
    fn black_is_pure_key() {
        let cmyk = rgb_to_cmyk(Color::BLACK);
        assert_eq!(
            cmyk,
            Cmyk {
                c: 0.0,
                m: 0.0,
                y: 0.0,
                k: 1.0
            }
        );
        assert_eq!(cmyk_to_rgb(cmyk).unwrap(), Color::BLACK);
    }

    #[test]
    fn cmyk_known_values() {
        let cmyk = rgb_to_cmyk(Color::rgb(255, 0, 0));
        assert!(approx_eq(cmyk.c, 0.0));
        assert!(approx_eq(cmyk.m, 1.0));
        assert!(approx_eq(cmyk.y, 1.0));
        assert!(approx_eq(cmyk.k, 0.0));
    }

    #[test]
    fn cmyk_to_rgb_rejects_out_of_range() {
        assert!(cmyk_to_rgb(Cmyk {
            c: -0.1,
            m: 0.0,
            y: 0.0,
            k: 0.0
        })
        .is_err());
    }

    // -- XYZ / LAB --

    #[test]
    fn white_is_d65_in_xyz() {
        let xyz = rgb_to_xyz(Color::WHITE);
        assert!((xyz.x - D65_WHITE.x).abs() < 1e-4, "x = {}", xyz.x);
        assert!((xyz.y - D65_WHITE.y).abs() < 1e-4, "y = {}", xyz.y);
        assert!((xyz.z - D65_WHITE.z).abs() < 1e-4, "z = {}", xyz.z);
    }

    #[test]
    fn white_and_black_in_lab() {
        let white = rgb_to_lab(Color::WHITE);
        assert!((white.l - 100.0).abs() < 1e-3, "L = {}", white.l);
        assert!(white.a.abs() < 1e-2 && white.b.abs() < 1e-2);
        let black = rgb_to_lab(Color::BLACK);
        assert!(black.l.abs() < 1e-9);
    }

    #[test]
    fn red_in_lab_matches_reference() {
        let lab = rgb_to_lab(Color::rgb(255, 0, 0));
        assert!((lab.l - 53.24).abs() < 0.05, "L = {}", lab.l);
        assert!((lab.a - 80.09).abs() < 0.05, "a = {}", lab.a);
        assert!((lab.b - 67.20).abs() < 0.05, "b = {}", lab.b);
    }

    #[test]
    fn lab_to_rgb_clips_out_of_gamut() {
        let c = lab_to_rgb(Lab {
            l: 90.0,
            a: -120.0,
            b: 120.0,
        })
        .unwrap();
        assert_eq!(c.r, 0);
    }

    #[test]
    fn lab_to_rgb_rejects_lightness_out_of_range() {
        assert!(lab_to_rgb(Lab {
            l: 101.0,
            a: 0.0,
            b: 0.0
        })
        .is_err());
        assert!(lab_to_rgb(Lab {
            l: 50.0,
            a: f64::INFINITY,
            b: 0.0
        })
        .is_err());
    }

    #[test]
    fn xyz_to_rgb_rejects_negative() {
        assert!(xyz_to_rgb(Xyz {
            x: -0.1,
            y: 0.5,
            z: 0.5
        })
        .is_err());
    }

    #[test]
    fn delta_e_of_identical_colors_is_zero() {
        let c = Color::rgb(12, 34, 56);
        assert!(approx_eq(delta_e(c, c), 0.0));
        assert!(delta_e(Color::BLACK, Color::WHITE) > 99.0);
    }

    // -- blend / format --

    #[test]
    fn gradient_includes_both_ends() {
        let g = gradient(Color::BLACK, Color::WHITE, 3);
        assert_eq!(
            g,
            vec![
                Color::BLACK,
                Color::rgb(64, 64, 64),
                Color::rgb(128, 128, 128),
                Color::rgb(191, 191, 191),
                Color::WHITE,
            ]
        );
        assert_eq!(gradient(Color::BLACK, Color::WHITE, 0), vec![Color::BLACK, Color::WHITE]);
    }

    #[test]
    fn blend_midpoint() {
        let mid = blend(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
        assert_eq!(blend(Color::BLACK, Color::WHITE, -3.0), Color::BLACK);
    }

    #[test]
    fn blend_carries_alpha_when_either_side_has_it() {
        let c = blend(Color::rgba(0, 0, 0, 0), Color::WHITE, 1.0);
        assert_eq!(c.a, Some(255));
    }

    #[test]
    fn format_uses_percentages() {
        let c = Color::rgb(0x33, 0x66, 0x99);
        assert_eq!(c.format(ColorModel::Hsl), "hsl(210.0, 50.0%, 40.0%)");
        assert_eq!(c.format(ColorModel::Rgb), "rgb(51, 102, 153)");
        assert_eq!(
            Color::rgba(1, 2, 3, 128).format(ColorModel::Rgb),
            "rgba(1, 2, 3, 0.502)"
        );
    }

    #[test]
    fn format_alpha_trims_trailing_zeros() {
        assert_eq!(format_alpha(255), "1");
        assert_eq!(format_alpha(0), "0");
        assert_eq!(format_alpha(51), "0.2");
    }

    #[test]
    fn color_json_omits_missing_alpha() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"r":1,"g":2,"b":3}"#);
        let back: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3,"a":4}"#).unwrap();
        assert_eq!(back, Color::rgba(1, 2, 3, 4));
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex_round_trip_is_lossless(r: u8, g: u8, b: u8, a: Option<u8>) {
                let c = Color { r, g, b, a };
                let hex = c.to_hex();
                prop_assert_eq!(Color::from_hex(&hex).unwrap(), c);
                prop_assert_eq!(Color::from_hex(&hex).unwrap().to_hex(), hex);
            }

            #[test]
            fn hsl_round_trip_is_exact(r: u8, g: u8, b: u8) {
                let c = Color::rgb(r, g, b);
                prop_assert_eq!(hsl_to_rgb(rgb_to_hsl(c)).unwrap(), c);
            }

            #[test]
            fn hsv_round_trip_is_exact(r: u8, g: u8, b: u8) {
                let c = Color::rgb(r, g, b);
                prop_assert_eq!(hsv_to_rgb(rgb_to_hsv(c)).unwrap(), c);
            }

            #[test]
            fn hue_stays_in_range(r: u8, g: u8, b: u8) {
                let h = rgb_to_hsl(Color::rgb(r, g, b)).h;
                prop_assert!((0.0..360.0).contains(&h), "hue {}", h);
            }

            #[test]
            fn cmyk_round_trip_within_one_unit(r: u8, g: u8, b: u8) {
                let c = Color::rgb(r, g, b);
                let back = cmyk_to_rgb(rgb_to_cmyk(c)).unwrap();
                prop_assert!((back.r as i16 - r as i16).abs() <= 1);
                prop_assert!((back.g as i16 - g as i16).abs() <= 1);
                prop_assert!((back.b as i16 - b as i16).abs() <= 1);
            }

            #[test]
            fn lab_round_trip_within_one_unit(r: u8, g: u8, b: u8) {
                let c = Color::rgb(r, g, b);
                let back = lab_to_rgb(rgb_to_lab(c)).unwrap();
                prop_assert!((back.r as i16 - r as i16).abs() <= 1, "{:?} -> {:?}", c, back);
                prop_assert!((back.g as i16 - g as i16).abs() <= 1, "{:?} -> {:?}", c, back);
                prop_assert!((back.b as i16 - b as i16).abs() <= 1, "{:?} -> {:?}", c, back);
            }

            #[test]
            fn lab_to_rgb_is_total_over_valid_lightness(
                l in 0.0_f64..=100.0,
                a in -200.0_f64..200.0,
                b in -200.0_f64..200.0,
            ) {
                let lab = Lab { l, a, b };
                prop_assert!(lab_to_rgb(lab).is_ok());
            }
        }
    }
}
