//! Average color of a pixel sample.

use crate::color::Color;
use crate::error::ColorError;
use crate::sample::PixelSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How channel values are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AverageMethod {
    /// Plain per-channel mean.
    #[default]
    Arithmetic,
    /// Mean weighted by Rec. 601 luma (0.299 R + 0.587 G + 0.114 B).
    Weighted,
    /// Per-channel median.
    Median,
}

impl AverageMethod {
    pub const ALL: [AverageMethod; 3] = [
        AverageMethod::Arithmetic,
        AverageMethod::Weighted,
        AverageMethod::Median,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AverageMethod::Arithmetic => "arithmetic",
            AverageMethod::Weighted => "weighted",
            AverageMethod::Median => "median",
        }
    }
}

impl fmt::Display for AverageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AverageMethod {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AverageMethod::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ColorError::FormatError(format!("unknown average method: {s}")))
    }
}

/// Average color of every pixel in `sample`, alpha ignored. Channels are
/// rounded to the nearest integer. Weighting falls back to the plain mean
/// when every pixel is black.
pub fn average_color(sample: &PixelSample<'_>, method: AverageMethod) -> Color {
    let pixels = sample.pixels();
    match method {
        AverageMethod::Arithmetic => weighted_mean(pixels, |_| 1.0),
        AverageMethod::Weighted => {
            let luma = |c: Color| 0.299 * c.r as f64 + 0.587 * c.g as f64 + 0.114 * c.b as f64;
            if pixels.iter().all(|&c| luma(c) == 0.0) {
                log::debug!("all pixels black, using the arithmetic mean");
                weighted_mean(pixels, |_| 1.0)
            } else {
                weighted_mean(pixels, luma)
            }
        }
        AverageMethod::Median => Color::rgb(
            median(pixels.iter().map(|c| c.r)),
            median(pixels.iter().map(|c| c.g)),
            median(pixels.iter().map(|c| c.b)),
        ),
    }
}

fn weighted_mean(pixels: &[Color], weight: impl Fn(Color) -> f64) -> Color {
    let mut sum = [0.0f64; 3];
    let mut total = 0.0;
    for &c in pixels {
        let w = weight(c);
        sum[0] += w * c.r as f64;
        sum[1] += w * c.g as f64;
        sum[2] += w * c.b as f64;
        total += w;
    }
    let channel = |s: f64| (s / total).round().clamp(0.0, 255.0) as u8;
    Color::rgb(channel(sum[0]), channel(sum[1]), channel(sum[2]))
}

/// Median of channel values via a 256-bin count; even counts average the
/// two middle values.
fn median(values: impl Iterator<Item = u8>) -> u8 {
    let mut bins = [0u64; 256];
    let mut n = 0u64;
    for v in values {
        bins[v as usize] += 1;
        n += 1;
    }
    let nth = |k: u64| {
        let mut seen = 0;
        for (v, &count) in bins.iter().enumerate() {
            seen += count;
            if seen > k {
                return v as f64;
            }
        }
        0.0
    };
    let mid = if n % 2 == 1 {
        nth(n / 2)
    } else {
        (nth(n / 2 - 1) + nth(n / 2)) / 2.0
    };
    mid.round() as u8
}
