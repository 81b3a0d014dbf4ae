//! Palette interchange format identifiers.

use crate::error::ColorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A palette interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `{"name", "colors": [...]}` document.
    Json,
    /// CSS custom properties inside `:root`.
    Css,
    /// SCSS `$variables`.
    Scss,
    /// Sass indented-syntax `$variables`, no semicolons.
    Sass,
    /// LESS `@variables`.
    Less,
    /// Adobe Swatch Exchange.
    Ase,
    /// Adobe Color swatches (Photoshop).
    Aco,
    /// GIMP palette.
    Gpl,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 8] = [
        Format::Json,
        Format::Css,
        Format::Scss,
        Format::Sass,
        Format::Less,
        Format::Ase,
        Format::Aco,
        Format::Gpl,
    ];

    /// Lowercase format name.
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Css => "css",
            Format::Scss => "scss",
            Format::Sass => "sass",
            Format::Less => "less",
            Format::Ase => "ase",
            Format::Aco => "aco",
            Format::Gpl => "gpl",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Format::Json => "JSON palette document",
            Format::Css => "CSS custom properties",
            Format::Scss => "SCSS variables",
            Format::Sass => "Sass variables (indented syntax)",
            Format::Less => "LESS variables",
            Format::Ase => "Adobe Swatch Exchange",
            Format::Aco => "Adobe Color swatches",
            Format::Gpl => "GIMP palette",
        }
    }

    /// Whether the encoding is a binary layout rather than UTF-8 text.
    pub fn is_binary(self) -> bool {
        matches!(self, Format::Ase | Format::Aco)
    }

    /// Looks up a format by file extension (case-insensitive, with or without dot).
    pub fn from_extension(ext: &str) -> Result<Format, ColorError> {
        ext.trim_start_matches('.').parse()
    }

    /// Looks up a format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Format, ColorError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ColorError::UnsupportedFormat(path.display().to_string()))?;
        Format::from_extension(ext)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Format::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| ColorError::UnsupportedFormat(s.to_string()))
    }
}
