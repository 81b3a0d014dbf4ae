//! Adobe Color swatches (`.aco`), as written by Photoshop.
//!
//! A file holds a version 1 section followed by an optional version 2
//! section that repeats the same colors with names:
//!
//! ```text
//! u16 version  u16 count
//! count × { u16 space  u16 w  u16 x  u16 y  u16 z
//!           [v2 only] u32 name length (UTF-16 units, NUL included)
//!                     UTF-16BE name, NUL-terminated }
//! ```
//!
//! RGB channels are 16-bit; 8-bit values are scaled by 257 on encode and
//! divided by 257 (rounded) on decode, which restores them exactly.

use crate::binary::{fits, put_u16, put_u32, put_utf16, unit_channel, utf16_nul, Reader};
use pigment_core::color::{cmyk_to_rgb, hsv_to_rgb, lab_to_rgb, Cmyk, Color, Hsv, Lab};
use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::{Palette, Swatch};

const SPACE_RGB: u16 = 0;
const SPACE_HSB: u16 = 1;
const SPACE_CMYK: u16 = 2;
const SPACE_LAB: u16 = 7;
const SPACE_GRAY: u16 = 8;

pub(crate) fn decode(bytes: &[u8]) -> Result<Palette, ColorError> {
    let mut r = Reader::new(bytes);
    let version_at = r.offset();
    let version = r.u16("version")?;
    let mut colors = match version {
        1 => read_section(&mut r, false)?,
        2 => read_section(&mut r, true)?,
        other => {
            return Err(ColorError::malformed(
                Location::Offset(version_at),
                format!("unsupported ACO version {other}"),
            ))
        }
    };

    if version == 1 && r.remaining() >= 2 {
        let v2_at = r.offset();
        match r.u16("version")? {
            2 => {
                let named = read_section(&mut r, true)?;
                if named.len() != colors.len() {
                    log::warn!(
                        "ACO version 2 section has {} colors, version 1 had {}",
                        named.len(),
                        colors.len()
                    );
                }
                colors = named;
            }
            other => log::warn!("ignoring ACO section with version {other} at byte {v2_at}"),
        }
    }
    if !r.is_empty() {
        log::warn!("{} trailing bytes in ACO file", r.remaining());
    }

    log::debug!("decoded {} ACO swatches", colors.len());
    Ok(Palette::with_entries("", colors).with_source(Format::Aco))
}

fn read_section(r: &mut Reader<'_>, named: bool) -> Result<Vec<Swatch>, ColorError> {
    let count = r.u16("color count")? as usize;
    let mut swatches = Vec::with_capacity(count);
    for _ in 0..count {
        let space_at = r.offset();
        let space = r.u16("color space")?;
        let mut ch = [0u16; 4];
        for c in &mut ch {
            *c = r.u16("color channel")?;
        }
        let color = to_color(space, ch)
            .map_err(|reason| ColorError::malformed(Location::Offset(space_at), reason))?;
        let mut swatch = Swatch::new(color);
        if named {
            let units = r.u32("name length")? as usize;
            let name = r.utf16(units, "swatch name")?;
            if !name.is_empty() {
                swatch.name = Some(name);
            }
        }
        swatches.push(swatch);
    }
    Ok(swatches)
}

fn to_color(space: u16, [w, x, y, z]: [u16; 4]) -> Result<Color, String> {
    let unit = |v: u16| v as f64 / 65535.0;
    let from_8bit = |v: u16| (v as f64 / 257.0).round() as u8;
    match space {
        SPACE_RGB => Ok(Color::rgb(from_8bit(w), from_8bit(x), from_8bit(y))),
        SPACE_HSB => {
            let h = unit(w) * 360.0;
            hsv_to_rgb(Hsv {
                h: if h >= 360.0 { 0.0 } else { h },
                s: unit(x),
                v: unit(y),
            })
            .map_err(|e| e.to_string())
        }
        // Photoshop stores ink coverage inverted: 0 is full ink.
        SPACE_CMYK => cmyk_to_rgb(Cmyk {
            c: 1.0 - unit(w),
            m: 1.0 - unit(x),
            y: 1.0 - unit(y),
            k: 1.0 - unit(z),
        })
        .map_err(|e| e.to_string()),
        SPACE_LAB => lab_to_rgb(Lab {
            l: (w as f64 / 100.0).clamp(0.0, 100.0),
            a: x as i16 as f64 / 100.0,
            b: y as i16 as f64 / 100.0,
        })
        .map_err(|e| e.to_string()),
        // 0..=10000, where 10000 is full black ink.
        SPACE_GRAY => {
            let v = unit_channel(1.0 - (w as f64 / 10000.0).min(1.0));
            Ok(Color::rgb(v, v, v))
        }
        other => Err(format!("unsupported color space {other}")),
    }
}

pub(crate) fn encode(palette: &Palette) -> Result<Vec<u8>, ColorError> {
    let count: u16 = fits(palette.len(), "ACO color count")?;
    if palette.iter().any(|s| s.color.a.is_some()) {
        log::warn!("ACO has no alpha channel; alpha dropped");
    }
    let mut out = Vec::with_capacity(4 + palette.len() * 30);

    put_u16(&mut out, 1);
    put_u16(&mut out, count);
    for swatch in palette {
        put_rgb(&mut out, swatch.color);
    }

    put_u16(&mut out, 2);
    put_u16(&mut out, count);
    for swatch in palette {
        put_rgb(&mut out, swatch.color);
        let units = utf16_nul(swatch.name.as_deref().unwrap_or(""));
        put_u32(&mut out, fits(units.len(), "ACO name length")?);
        put_utf16(&mut out, &units);
    }
    Ok(out)
}

fn put_rgb(out: &mut Vec<u8>, c: Color) {
    put_u16(out, SPACE_RGB);
    put_u16(out, c.r as u16 * 257);
    put_u16(out, c.g as u16 * 257);
    put_u16(out, c.b as u16 * 257);
    put_u16(out, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1(colors: &[(u16, [u16; 4])]) -> Vec<u8> {
        let mut out = Vec::new();
        put_u16(&mut out, 1);
        put_u16(&mut out, colors.len() as u16);
        for &(space, ch) in colors {
            put_u16(&mut out, space);
            for c in ch {
                put_u16(&mut out, c);
            }
        }
        out
    }

    #[test]
    fn encodes_scaled_channels() {
        let mut p = Palette::new("x");
        p.push(Swatch::new(Color::rgb(255, 1, 0)).named("A"));
        let bytes = encode(&p).unwrap();
        assert_eq!(&bytes[0..4], &[0, 1, 0, 1]);
        assert_eq!(&bytes[4..14], &[0, 0, 0xFF, 0xFF, 0x01, 0x01, 0, 0, 0, 0]);
        // version 2 section
        assert_eq!(&bytes[14..18], &[0, 2, 0, 1]);
        assert_eq!(&bytes[28..32], &[0, 0, 0, 2]);
        assert_eq!(&bytes[32..36], &[0, b'A', 0, 0]);
        assert_eq!(bytes.len(), 36);
    }

    #[test]
    fn round_trip_restores_8bit_values_and_names() {
        let mut p = Palette::new("x");
        p.push(Swatch::new(Color::rgb(0, 127, 255)).named("Azure"));
        p.push(Swatch::new(Color::rgb(1, 2, 3)));
        let decoded = decode(&encode(&p).unwrap()).unwrap();
        assert_eq!(decoded.colors(), p.colors());
        assert_eq!(decoded.get(0).unwrap().name.as_deref(), Some("Azure"));
        assert_eq!(decoded.get(1).unwrap().name, None);
        assert_eq!(decoded.source, Some(Format::Aco));
    }

    #[test]
    fn version_1_only_file_decodes_unnamed() {
        let bytes = v1(&[(SPACE_RGB, [0xFFFF, 0, 0x8080, 0])]);
        let p = decode(&bytes).unwrap();
        assert_eq!(p.colors(), vec![Color::rgb(255, 0, 128)]);
        assert_eq!(p.get(0).unwrap().name, None);
    }

    #[test]
    fn decodes_other_color_spaces() {
        let bytes = v1(&[
            (SPACE_HSB, [0, 0xFFFF, 0xFFFF, 0]),
            (SPACE_CMYK, [0xFFFF, 0, 0, 0xFFFF]),
            (SPACE_LAB, [10000, 0, 0, 0]),
            (SPACE_GRAY, [10000, 0, 0, 0]),
            (SPACE_GRAY, [0, 0, 0, 0]),
        ]);
        let p = decode(&bytes).unwrap();
        assert_eq!(
            p.colors(),
            vec![
                Color::rgb(255, 0, 0),
                Color::rgb(255, 0, 0),
                Color::WHITE,
                Color::BLACK,
                Color::WHITE,
            ]
        );
    }

    #[test]
    fn unknown_space_reports_offset() {
        let bytes = v1(&[(SPACE_RGB, [0; 4]), (3, [0; 4])]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ColorError::MalformedPalette {
                at: Location::Offset(14),
                ..
            }
        ));
    }

    #[test]
    fn bad_version_is_malformed() {
        let err = decode(&[0, 9, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            ColorError::MalformedPalette {
                at: Location::Offset(0),
                ..
            }
        ));
    }

    #[test]
    fn truncation_is_malformed() {
        let mut p = Palette::new("x");
        p.push(Swatch::new(Color::rgb(9, 8, 7)).named("n"));
        let bytes = encode(&p).unwrap();
        // Cutting inside the version 1 section or inside a version 2 entry fails.
        for cut in (0..14).chain(16..bytes.len()) {
            assert!(
                matches!(decode(&bytes[..cut]), Err(ColorError::MalformedPalette { .. })),
                "cut {cut}"
            );
        }
    }

    #[test]
    fn empty_palette_round_trips() {
        let bytes = encode(&Palette::new("e")).unwrap();
        assert_eq!(bytes, vec![0, 1, 0, 0, 0, 2, 0, 0]);
        assert!(decode(&bytes).unwrap().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scaling_by_257_is_reversible(r: u8, g: u8, b: u8) {
                let p = Palette::from_colors("p", [Color::rgb(r, g, b)]);
                let decoded = decode(&encode(&p).unwrap()).unwrap();
                prop_assert_eq!(decoded.colors(), vec![Color::rgb(r, g, b)]);
            }
        }
    }
}
