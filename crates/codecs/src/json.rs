//! JSON palette document.
//!
//! ```json
//! {"name": "Brand", "colors": [{"r": 255, "g": 0, "b": 0, "a": 128, "name": "Red"}]}
//! ```
//!
//! `a`, `name`, `weight` and `group` are optional. This is the lossless
//! format: every field of every swatch survives a round trip.

use pigment_core::color::Color;
use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::{Palette, Swatch};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    name: String,
    colors: Vec<Entry>,
}

#[derive(Serialize, Deserialize)]
struct Entry {
    r: u8,
    g: u8,
    b: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    a: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
}

impl From<&Swatch> for Entry {
    fn from(s: &Swatch) -> Self {
        Entry {
            r: s.color.r,
            g: s.color.g,
            b: s.color.b,
            a: s.color.a,
            name: s.name.clone(),
            weight: s.weight,
            group: s.group.clone(),
        }
    }
}

impl From<Entry> for Swatch {
    fn from(e: Entry) -> Self {
        Swatch {
            color: Color {
                r: e.r,
                g: e.g,
                b: e.b,
                a: e.a,
            },
            name: e.name,
            weight: e.weight,
            group: e.group,
        }
    }
}

pub(crate) fn decode(text: &str) -> Result<Palette, ColorError> {
    let doc: Document = serde_json::from_str(text).map_err(|e| {
        let at = if e.line() > 0 {
            Location::Line(e.line())
        } else {
            Location::Unknown
        };
        ColorError::malformed(at, e.to_string())
    })?;
    let entries = doc.colors.into_iter().map(Swatch::from).collect();
    Ok(Palette::with_entries(doc.name, entries).with_source(Format::Json))
}

pub(crate) fn encode(palette: &Palette) -> Result<String, ColorError> {
    if let Some(w) = palette.iter().filter_map(|s| s.weight).find(|w| !w.is_finite()) {
        return Err(ColorError::range("weight", w));
    }
    let doc = Document {
        name: palette.name.clone(),
        colors: palette.iter().map(Entry::from).collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| ColorError::malformed(Location::Unknown, e.to_string()))
}
