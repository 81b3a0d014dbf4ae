//! Nearest-color lookup by CIE76 distance.

use crate::color::{delta_e, Color};
use crate::error::ColorError;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};

/// Default cutoff for [`find_similar`], in ΔE units.
pub const DEFAULT_MAX_DISTANCE: f64 = 50.0;
/// Default number of matches returned by [`find_similar`].
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A candidate close to the target color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarColor {
    /// Position of the candidate in the searched list.
    pub index: usize,
    pub color: Color,
    /// CIE76 ΔE to the target.
    pub distance: f64,
    /// `100 · (max_distance − distance) / max_distance`.
    pub similarity: f64,
}

/// Candidates within `max_distance` of `target`, closest first, at most
/// `max_results` of them. Equal distances keep candidate order.
pub fn find_similar(
    target: Color,
    candidates: &[Color],
    max_distance: f64,
    max_results: usize,
) -> Result<Vec<SimilarColor>, ColorError> {
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(ColorError::range("max_distance", max_distance));
    }
    let mut matches: Vec<SimilarColor> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, &color)| {
            let distance = delta_e(target, color);
            (distance <= max_distance).then(|| SimilarColor {
                index,
                color,
                distance,
                similarity: (max_distance - distance) / max_distance * 100.0,
            })
        })
        .collect();
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    matches.truncate(max_results);
    Ok(matches)
}

impl Palette {
    /// Index and distance of the entry closest to `target`; `None` when empty.
    pub fn nearest(&self, target: Color) -> Option<(usize, f64)> {
        self.iter()
            .enumerate()
            .map(|(i, s)| (i, delta_e(target, s.color)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
