//! Adobe Swatch Exchange (`.ase`).
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! "ASEF"  u16 major = 1  u16 minor = 0  u32 block count
//! block:  u16 type  u32 body length  body
//! color body (type 0x0001):
//!     u16 name length in UTF-16 units, terminator included
//!     UTF-16BE name, NUL-terminated
//!     4-byte model: "RGB " | "CMYK" | "LAB " | "Gray"
//!     f32 channels (3, 4, 3 or 1)
//!     u16 color type (0 global, 1 spot, 2 normal)
//! group start body (type 0xC001): u16 name length, UTF-16BE name
//! group end body (type 0xC002): empty
//! ```

use crate::binary::{fits, put_f32, put_u16, put_u32, put_utf16, unit_channel, utf16_nul, Reader};
use pigment_core::color::{cmyk_to_rgb, lab_to_rgb, Cmyk, Color, Lab};
use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::{Palette, Swatch};

const SIGNATURE: &[u8; 4] = b"ASEF";
const BLOCK_COLOR: u16 = 0x0001;
const BLOCK_GROUP_START: u16 = 0xC001;
const BLOCK_GROUP_END: u16 = 0xC002;
const COLOR_TYPE_NORMAL: u16 = 2;

pub(crate) fn decode(bytes: &[u8]) -> Result<Palette, ColorError> {
    let mut r = Reader::new(bytes);
    let signature = r.take(4, "signature")?;
    if signature != SIGNATURE {
        return Err(ColorError::malformed(
            Location::Offset(0),
            "bad signature, expected ASEF",
        ));
    }
    let major = r.u16("version")?;
    let minor = r.u16("version")?;
    if major != 1 {
        log::warn!("ASE version {major}.{minor}, reading as 1.0");
    }
    let blocks = r.u32("block count")?;

    let mut palette = Palette::new("").with_source(Format::Ase);
    let mut group: Option<String> = None;
    for _ in 0..blocks {
        let kind = r.u16("block type")?;
        let len = r.u32("block length")? as usize;
        let body_at = r.offset();
        let mut body = Reader::at(r.take(len, "block body")?, body_at);
        match kind {
            BLOCK_COLOR => {
                let mut swatch = read_color(&mut body)?;
                swatch.group = group.clone();
                palette.push(swatch);
            }
            BLOCK_GROUP_START => {
                let units = body.u16("group name length")? as usize;
                let name = body.utf16(units, "group name")?;
                if palette.name.is_empty() {
                    palette.name = name.clone();
                }
                group = Some(name);
            }
            BLOCK_GROUP_END => group = None,
            other => log::warn!("skipping unknown ASE block type {other:#06x} at byte {body_at}"),
        }
        if !body.is_empty() && kind == BLOCK_COLOR {
            log::warn!("{} unread bytes in color block at byte {body_at}", body.remaining());
        }
    }
    if !r.is_empty() {
        log::warn!("{} trailing bytes after {blocks} ASE blocks", r.remaining());
    }
    log::debug!("decoded {} ASE swatches from {blocks} blocks", palette.len());
    Ok(palette)
}

fn read_color(body: &mut Reader<'_>) -> Result<Swatch, ColorError> {
    let units = body.u16("swatch name length")? as usize;
    let name = body.utf16(units, "swatch name")?;
    let model_at = body.offset();
    let model = body.take(4, "color model")?;
    let color = match model {
        b"RGB " => {
            let r = body.f32("red")? as f64;
            let g = body.f32("green")? as f64;
            let b = body.f32("blue")? as f64;
            Color::rgb(unit_channel(r), unit_channel(g), unit_channel(b))
        }
        b"CMYK" => {
            let c = body.f32("cyan")? as f64;
            let m = body.f32("magenta")? as f64;
            let y = body.f32("yellow")? as f64;
            let k = body.f32("black")? as f64;
            cmyk_to_rgb(Cmyk {
                c: c.clamp(0.0, 1.0),
                m: m.clamp(0.0, 1.0),
                y: y.clamp(0.0, 1.0),
                k: k.clamp(0.0, 1.0),
            })?
        }
        b"LAB " => {
            // Lightness is stored as a fraction of 100.
            let l = body.f32("lightness")? as f64 * 100.0;
            let a = body.f32("a")? as f64;
            let b = body.f32("b")? as f64;
            lab_to_rgb(Lab {
                l: l.clamp(0.0, 100.0),
                a,
                b,
            })?
        }
        b"Gray" => {
            let v = unit_channel(body.f32("gray")? as f64);
            Color::rgb(v, v, v)
        }
        other => {
            return Err(ColorError::malformed(
                Location::Offset(model_at),
                format!("unknown color model {:?}", String::from_utf8_lossy(other)),
            ))
        }
    };
    body.u16("color type")?;

    let mut swatch = Swatch::new(color);
    if !name.is_empty() {
        swatch.name = Some(name);
    }
    Ok(swatch)
}

pub(crate) fn encode(palette: &Palette) -> Result<Vec<u8>, ColorError> {
    let keep_groups = palette.source == Some(Format::Ase) && palette.has_groups();
    if palette.iter().any(|s| s.color.a.is_some()) {
        log::warn!("ASE has no alpha channel; alpha dropped");
    }

    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(palette.len());
    let mut open: Option<&str> = None;
    for swatch in palette {
        let group = if keep_groups { swatch.group.as_deref() } else { None };
        if group != open {
            if open.is_some() {
                blocks.push(block(BLOCK_GROUP_END, Vec::new())?);
            }
            if let Some(name) = group {
                blocks.push(block(BLOCK_GROUP_START, named_body(name)?)?);
            }
            open = group;
        }
        blocks.push(block(BLOCK_COLOR, color_body(swatch)?)?);
    }
    if open.is_some() {
        blocks.push(block(BLOCK_GROUP_END, Vec::new())?);
    }

    let mut out = Vec::with_capacity(12 + blocks.iter().map(Vec::len).sum::<usize>());
    out.extend_from_slice(SIGNATURE);
    put_u16(&mut out, 1);
    put_u16(&mut out, 0);
    put_u32(&mut out, fits(blocks.len(), "ASE block count")?);
    for b in blocks {
        out.extend_from_slice(&b);
    }
    Ok(out)
}

fn block(kind: u16, body: Vec<u8>) -> Result<Vec<u8>, ColorError> {
    let mut out = Vec::with_capacity(6 + body.len());
    put_u16(&mut out, kind);
    put_u32(&mut out, fits(body.len(), "ASE block length")?);
    out.extend_from_slice(&body);
    Ok(out)
}

fn named_body(name: &str) -> Result<Vec<u8>, ColorError> {
    let units = utf16_nul(name);
    let mut body = Vec::with_capacity(2 + units.len() * 2);
    put_u16(&mut body, fits(units.len(), "ASE name length")?);
    put_utf16(&mut body, &units);
    Ok(body)
}

fn color_body(swatch: &Swatch) -> Result<Vec<u8>, ColorError> {
    let mut body = named_body(swatch.name.as_deref().unwrap_or(""))?;
    body.extend_from_slice(b"RGB ");
    let [r, g, b] = swatch.color.to_unit();
    put_f32(&mut body, r as f32);
    put_f32(&mut body, g as f32);
    put_f32(&mut body, b as f32);
    put_u16(&mut body, COLOR_TYPE_NORMAL);
    Ok(body)
}
