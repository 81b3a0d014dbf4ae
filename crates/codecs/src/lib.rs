#![deny(unsafe_code)]
//! Palette codecs: maps each [`Format`] to a decoder and an encoder.
//!
//! Every codec is stateless. Text formats must be UTF-8 (a leading BOM is
//! ignored); decode failures report a line number for text formats and a
//! byte offset for the binary Adobe formats.

mod aco;
mod ase;
mod binary;
mod gpl;
mod json;
mod stylesheet;

use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::Palette;
use stylesheet::Dialect;

/// A palette reader and writer for one format.
pub trait Codec {
    /// The format this codec handles.
    fn format(&self) -> Format;

    /// Parses a palette from raw bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Palette, ColorError>;

    /// Serializes a palette to raw bytes.
    fn encode(&self, palette: &Palette) -> Result<Vec<u8>, ColorError>;
}

/// Codec for one of the built-in formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCodec(Format);

impl FormatCodec {
    pub fn new(format: Format) -> Self {
        FormatCodec(format)
    }

    /// Looks up a codec by format name; unknown names yield `UnsupportedFormat`.
    pub fn from_name(name: &str) -> Result<Self, ColorError> {
        Ok(FormatCodec(name.parse()?))
    }
}

impl Codec for FormatCodec {
    fn format(&self) -> Format {
        self.0
    }

    fn decode(&self, bytes: &[u8]) -> Result<Palette, ColorError> {
        match self.0 {
            Format::Json => json::decode(text(bytes)?),
            Format::Css => stylesheet::decode(text(bytes)?, Dialect::Css),
            Format::Scss => stylesheet::decode(text(bytes)?, Dialect::Scss),
            Format::Sass => stylesheet::decode(text(bytes)?, Dialect::Sass),
            Format::Less => stylesheet::decode(text(bytes)?, Dialect::Less),
            Format::Ase => ase::decode(bytes),
            Format::Aco => aco::decode(bytes),
            Format::Gpl => gpl::decode(text(bytes)?),
        }
    }

    fn encode(&self, palette: &Palette) -> Result<Vec<u8>, ColorError> {
        Ok(match self.0 {
            Format::Json => json::encode(palette)?.into_bytes(),
            Format::Css => stylesheet::encode(palette, Dialect::Css).into_bytes(),
            Format::Scss => stylesheet::encode(palette, Dialect::Scss).into_bytes(),
            Format::Sass => stylesheet::encode(palette, Dialect::Sass).into_bytes(),
            Format::Less => stylesheet::encode(palette, Dialect::Less).into_bytes(),
            Format::Ase => ase::encode(palette)?,
            Format::Aco => aco::encode(palette)?,
            Format::Gpl => gpl::encode(palette).into_bytes(),
        })
    }
}

/// Decodes `bytes` as `format`.
pub fn decode(format: Format, bytes: &[u8]) -> Result<Palette, ColorError> {
    let palette = FormatCodec::new(format).decode(bytes)?;
    log::debug!("{format}: {} swatches in {} bytes", palette.len(), bytes.len());
    Ok(palette)
}

/// Encodes `palette` as `format`.
pub fn encode(palette: &Palette, format: Format) -> Result<Vec<u8>, ColorError> {
    FormatCodec::new(format).encode(palette)
}

/// Guesses the format from leading bytes. Stylesheet dialects are told apart
/// by their first variable declaration outside comments.
pub fn detect(bytes: &[u8]) -> Option<Format> {
    if bytes.starts_with(b"ASEF") {
        return Some(Format::Ase);
    }
    if matches!(bytes, [0, 1 | 2, _, _, ..]) {
        return Some(Format::Aco);
    }
    let text = std::str::from_utf8(bytes).ok()?;
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("GIMP Palette") {
        return Some(Format::Gpl);
    }
    if trimmed.starts_with('{') {
        return Some(Format::Json);
    }
    stylesheet::sniff(trimmed)
}

fn text(bytes: &[u8]) -> Result<&str, ColorError> {
    let s = std::str::from_utf8(bytes).map_err(|e| {
        ColorError::malformed(Location::Offset(e.valid_up_to()), "invalid UTF-8")
    })?;
    Ok(s.strip_prefix('\u{feff}').unwrap_or(s))
}
