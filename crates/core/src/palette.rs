//! Ordered, named collection of swatches.
//!
//! A palette keeps entries in insertion order and allows duplicate colors;
//! it is a list, not a set. `source` records which format a decoded palette
//! came from so encoders can preserve format-specific metadata (ASE groups)
//! on a round trip.

use crate::color::Color;
use crate::error::ColorError;
use crate::extract::DominantColor;
use crate::format::Format;
use crate::harmony::HarmonyResult;
use serde::{Deserialize, Serialize};

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Frequency weight, typically from dominant-color extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// ASE group the entry belonged to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Swatch {
    /// An unnamed, unweighted swatch.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            name: None,
            weight: None,
            group: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl From<Color> for Swatch {
    fn from(color: Color) -> Self {
        Swatch::new(color)
    }
}

/// A named, ordered sequence of swatches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    entries: Vec<Swatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Format>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            source: None,
        }
    }

    /// Creates a palette from swatches, keeping their order.
    pub fn with_entries(name: impl Into<String>, entries: Vec<Swatch>) -> Self {
        Self {
            name: name.into(),
            entries,
            source: None,
        }
    }

    /// Creates a palette of unnamed swatches.
    pub fn from_colors(name: impl Into<String>, colors: impl IntoIterator<Item = Color>) -> Self {
        Self::with_entries(name, colors.into_iter().map(Swatch::new).collect())
    }

    /// Parses each string with [`Color::from_hex`].
    ///
    /// Fails on the first invalid string with `ColorError::FormatError`.
    pub fn from_hex(name: impl Into<String>, hexes: &[&str]) -> Result<Self, ColorError> {
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_colors(name, colors))
    }

    /// Builds a palette from extraction results, carrying their weights.
    pub fn from_dominant(name: impl Into<String>, dominant: &[DominantColor]) -> Self {
        Self::with_entries(
            name,
            dominant
                .iter()
                .map(|d| Swatch::new(d.color).weighted(d.weight))
                .collect(),
        )
    }

    /// Builds a palette holding the harmony base followed by its derived colors.
    pub fn from_harmony(harmony: &HarmonyResult) -> Self {
        let mut palette = Self::new(format!("{} harmony", harmony.kind));
        palette.push(Swatch::new(harmony.base).named("base"));
        for &c in &harmony.colors {
            palette.push(Swatch::new(c));
        }
        palette
    }

    /// Marks the format this palette was decoded from.
    pub fn with_source(mut self, source: Format) -> Self {
        self.source = Some(source);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Swatch> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Swatch> {
        self.entries.get_mut(index)
    }

    pub fn entries(&self) -> &[Swatch] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Swatch> {
        self.entries.iter()
    }

    /// Colors in entry order.
    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|s| s.color).collect()
    }

    /// Appends a swatch.
    pub fn push(&mut self, swatch: impl Into<Swatch>) {
        self.entries.push(swatch.into());
    }

    /// Inserts a swatch before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, swatch: impl Into<Swatch>) -> Result<(), ColorError> {
        if index > self.entries.len() {
            return Err(ColorError::range("palette index", index as f64));
        }
        self.entries.insert(index, swatch.into());
        Ok(())
    }

    /// Removes and returns the swatch at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Swatch, ColorError> {
        if index >= self.entries.len() {
            return Err(ColorError::range("palette index", index as f64));
        }
        Ok(self.entries.remove(index))
    }

    /// Moves the swatch at `from` so that it ends up at `to`.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), ColorError> {
        let len = self.entries.len();
        if from >= len {
            return Err(ColorError::range("palette index", from as f64));
        }
        if to >= len {
            return Err(ColorError::range("palette index", to as f64));
        }
        let swatch = self.entries.remove(from);
        self.entries.insert(to, swatch);
        Ok(())
    }

    /// Drops entries whose color (alpha included) already appeared earlier.
    /// Returns how many entries were removed.
    pub fn dedupe(&mut self) -> usize {
        let before = self.entries.len();
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|s| seen.insert(s.color));
        before - self.entries.len()
    }

    /// The entry's own name, or `color-N` with N its 1-based position when
    /// the name is missing or blank.
    pub fn display_name(&self, index: usize) -> String {
        match self
            .entries
            .get(index)
            .and_then(|s| s.name.as_deref())
            .filter(|n| !n.trim().is_empty())
        {
            Some(name) => name.to_string(),
            None => format!("color-{}", index + 1),
        }
    }

    /// Distinct group names in first-appearance order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for g in self.entries.iter().filter_map(|s| s.group.as_deref()) {
            if !groups.contains(&g) {
                groups.push(g);
            }
        }
        groups
    }

    pub fn has_groups(&self) -> bool {
        self.entries.iter().any(|s| s.group.is_some())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = std::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Swatch> for Palette {
    fn extend<T: IntoIterator<Item = Swatch>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
