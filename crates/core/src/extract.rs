//! Dominant color extraction by coarse histogram plus refinement.
//!
//! Every sampled pixel is dropped into a bucket keyed by its channels
//! truncated to `bits_per_channel` bits. The heaviest `count` buckets become
//! centers, each placed at the exact mean of the pixels that fell into it.
//! Each pixel of the remaining buckets is credited to its own nearest
//! center, so the returned weights account for every sampled pixel.
//!
//! When the sample holds no more distinct colors than requested, the
//! distinct colors are returned unchanged with their true frequencies.
//!
//! With the `rayon` feature the histogram is accumulated per row in
//! parallel; bucket merging is commutative so the result is identical
//! either way.

use crate::color::Color;
use crate::error::ColorError;
use crate::params::{param_bool, param_usize};
use crate::sample::PixelSample;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Default number of dominant colors.
pub const DEFAULT_COUNT: usize = 8;
/// Largest number of dominant colors that may be requested.
pub const MAX_COUNT: usize = 64;
/// Default quantization depth.
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 5;

/// Tunables for [`extract_dominant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    count: usize,
    bits_per_channel: u8,
    respect_alpha: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            bits_per_channel: DEFAULT_BITS_PER_CHANNEL,
            respect_alpha: false,
        }
    }
}

impl ExtractOptions {
    /// Validates `count` in [1, 64] and `bits_per_channel` in [1, 8].
    pub fn new(count: usize, bits_per_channel: u8, respect_alpha: bool) -> Result<Self, ColorError> {
        if !(1..=MAX_COUNT).contains(&count) {
            return Err(ColorError::range("count", count as f64));
        }
        if !(1..=8).contains(&bits_per_channel) {
            return Err(ColorError::range("bits_per_channel", bits_per_channel as f64));
        }
        Ok(Self {
            count,
            bits_per_channel,
            respect_alpha,
        })
    }

    /// Default options with a different color count.
    pub fn with_count(count: usize) -> Result<Self, ColorError> {
        Self::new(count, DEFAULT_BITS_PER_CHANNEL, false)
    }

    /// Reads `count`, `bits_per_channel` and `respect_alpha` from a JSON object.
    pub fn from_json(params: &Value) -> Result<Self, ColorError> {
        let bits = param_usize(params, "bits_per_channel", DEFAULT_BITS_PER_CHANNEL as usize);
        let bits = u8::try_from(bits).map_err(|_| ColorError::range("bits_per_channel", bits as f64))?;
        Self::new(
            param_usize(params, "count", DEFAULT_COUNT),
            bits,
            param_bool(params, "respect_alpha", false),
        )
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }

    /// Whether fully transparent pixels are skipped.
    pub fn respect_alpha(&self) -> bool {
        self.respect_alpha
    }
}

/// One extracted color with its share of the sampled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub color: Color,
    /// Fraction of sampled pixels in (0, 1].
    pub weight: f64,
    pub pixel_count: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u64,
    sum: [u64; 3],
}

impl Bucket {
    fn add(&mut self, c: Color) {
        self.count += 1;
        self.sum[0] += c.r as u64;
        self.sum[1] += c.g as u64;
        self.sum[2] += c.b as u64;
    }

    fn absorb(&mut self, other: &Bucket) {
        self.count += other.count;
        for (s, o) in self.sum.iter_mut().zip(other.sum) {
            *s += o;
        }
    }

    fn mean(&self) -> [f64; 3] {
        let n = self.count as f64;
        [
            self.sum[0] as f64 / n,
            self.sum[1] as f64 / n,
            self.sum[2] as f64 / n,
        ]
    }

    fn mean_color(&self) -> Color {
        let [r, g, b] = self.mean();
        Color::rgb(r.round() as u8, g.round() as u8, b.round() as u8)
    }
}

/// Buckets keyed by `(qR << 16) | (qG << 8) | qB`, so key order is
/// ascending `(qR, qG, qB)`.
#[derive(Debug, Default)]
struct Histogram {
    buckets: BTreeMap<u32, Bucket>,
    sampled: u64,
}

impl Histogram {
    fn add_row(&mut self, row: &[Color], shift: u32, respect_alpha: bool) {
        for &c in row {
            if respect_alpha && c.a == Some(0) {
                continue;
            }
            self.buckets.entry(bucket_key(c, shift)).or_default().add(c);
            self.sampled += 1;
        }
    }

    fn merge(mut self, other: Histogram) -> Histogram {
        for (key, bucket) in other.buckets {
            self.buckets.entry(key).or_default().absorb(&bucket);
        }
        self.sampled += other.sampled;
        self
    }
}

fn bucket_key(c: Color, shift: u32) -> u32 {
    ((c.r as u32 >> shift) << 16) | ((c.g as u32 >> shift) << 8) | (c.b as u32 >> shift)
}

#[cfg(feature = "rayon")]
fn histogram(sample: &PixelSample<'_>, shift: u32, respect_alpha: bool) -> Histogram {
    use rayon::prelude::*;

    sample
        .pixels()
        .par_chunks(sample.width())
        .fold(Histogram::default, |mut h, row| {
            h.add_row(row, shift, respect_alpha);
            h
        })
        .reduce(Histogram::default, Histogram::merge)
}

#[cfg(not(feature = "rayon"))]
fn histogram(sample: &PixelSample<'_>, shift: u32, respect_alpha: bool) -> Histogram {
    sample.rows().fold(Histogram::default(), |mut h, row| {
        h.add_row(row, shift, respect_alpha);
        h
    })
}

/// Extracts up to `options.count()` dominant colors from `sample`.
///
/// Results are ordered by weight, heaviest first; equal weights keep
/// ascending quantized `(R, G, B)` order. Weights sum to 1. Returned colors
/// carry no alpha. An empty result means every pixel was skipped as
/// transparent.
pub fn extract_dominant(sample: &PixelSample<'_>, options: &ExtractOptions) -> Vec<DominantColor> {
    let shift = 8 - options.bits_per_channel as u32;
    let hist = histogram(sample, shift, options.respect_alpha);
    log::debug!(
        "histogram: {} buckets from {} sampled pixels",
        hist.buckets.len(),
        hist.sampled
    );
    if hist.sampled == 0 {
        log::warn!("no opaque pixels to extract from");
        return Vec::new();
    }

    if hist.buckets.len() <= options.count {
        let exact = histogram(sample, 0, options.respect_alpha);
        if exact.buckets.len() <= options.count {
            log::debug!("{} distinct colors, returning them exactly", exact.buckets.len());
            return finish(
                exact
                    .buckets
                    .into_values()
                    .map(|b| (b.mean_color(), b.count))
                    .collect(),
                exact.sampled,
            );
        }
    }

    let (keys, buckets): (Vec<u32>, Vec<Bucket>) = hist.buckets.into_iter().unzip();
    let mut order: Vec<usize> = (0..buckets.len()).collect();
    // Indices already follow key order, so a stable sort keeps the tie-break.
    order.sort_by(|&a, &b| buckets[b].count.cmp(&buckets[a].count));
    let selected = &order[..options.count.min(order.len())];

    let centers: Vec<[f64; 3]> = selected.iter().map(|&i| buckets[i].mean()).collect();
    let slots: HashMap<u32, usize> = selected
        .iter()
        .enumerate()
        .map(|(slot, &i)| (keys[i], slot))
        .collect();
    let mut counts: Vec<u64> = selected.iter().map(|&i| buckets[i].count).collect();
    assign_unselected(sample, options, shift, &slots, &centers, &mut counts);

    let refined = selected
        .iter()
        .zip(counts)
        .map(|(&i, count)| (buckets[i].mean_color(), count))
        .collect();
    finish(refined, hist.sampled)
}

/// Credits every sampled pixel outside the selected buckets to its own
/// nearest center.
fn assign_unselected(
    sample: &PixelSample<'_>,
    options: &ExtractOptions,
    shift: u32,
    slots: &HashMap<u32, usize>,
    centers: &[[f64; 3]],
    counts: &mut [u64],
) {
    let mut nearest: HashMap<[u8; 3], usize> = HashMap::new();
    let mut reassigned = 0u64;
    for &c in sample.pixels() {
        if options.respect_alpha && c.a == Some(0) {
            continue;
        }
        if slots.contains_key(&bucket_key(c, shift)) {
            continue;
        }
        let slot = *nearest
            .entry([c.r, c.g, c.b])
            .or_insert_with(|| nearest_center(centers, [c.r as f64, c.g as f64, c.b as f64]));
        counts[slot] += 1;
        reassigned += 1;
    }
    log::debug!("{reassigned} pixels outside the selected buckets reassigned");
}

/// Convenience wrapper with default options and the given color count.
pub fn extract_dominant_colors(
    sample: &PixelSample<'_>,
    count: usize,
) -> Result<Vec<DominantColor>, ColorError> {
    Ok(extract_dominant(sample, &ExtractOptions::with_count(count)?))
}

fn nearest_center(centers: &[[f64; 3]], p: [f64; 3]) -> usize {
    let dist = |c: &[f64; 3]| (0..3).map(|k| (c[k] - p[k]).powi(2)).sum::<f64>();
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = dist(c);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

/// Merges centers that rounded to the same color, then orders and weights them.
///
/// `entries` must arrive in tie-break order; the sort below is stable.
fn finish(entries: Vec<(Color, u64)>, sampled: u64) -> Vec<DominantColor> {
    let mut merged: Vec<(Color, u64)> = Vec::with_capacity(entries.len());
    for (color, count) in entries {
        match merged.iter_mut().find(|(c, _)| *c == color) {
            Some(slot) => slot.1 += count,
            None => merged.push((color, count)),
        }
    }
    merged.sort_by(|a, b| b.1.cmp(&a.1));
    merged
        .into_iter()
        .map(|(color, pixel_count)| DominantColor {
            color,
            weight: pixel_count as f64 / sampled as f64,
            pixel_count,
        })
        .collect()
}
