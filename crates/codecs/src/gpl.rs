//! GIMP palette (`.gpl`).

use pigment_core::color::Color;
use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::{Palette, Swatch};

const MAGIC: &str = "GIMP Palette";

pub(crate) fn decode(text: &str) -> Result<Palette, ColorError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));
    let header = lines.by_ref().find(|(_, l)| !l.is_empty());
    match header {
        Some((_, MAGIC)) => {}
        Some((n, other)) => {
            return Err(ColorError::malformed(
                Location::Line(n),
                format!("expected '{MAGIC}', found '{other}'"),
            ))
        }
        None => return Err(ColorError::malformed(Location::Line(1), "empty document")),
    }

    let mut palette = Palette::new("").with_source(Format::Gpl);
    for (n, line) in lines {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix("Name:") {
            palette.name = name.trim().to_string();
            continue;
        }
        if let Some(columns) = line.strip_prefix("Columns:") {
            log::debug!("ignoring Columns: {}", columns.trim());
            continue;
        }
        palette.push(parse_entry(line).map_err(|reason| ColorError::malformed(Location::Line(n), reason))?);
    }
    log::debug!("decoded {} GPL swatches", palette.len());
    Ok(palette)
}

fn parse_entry(line: &str) -> Result<Swatch, String> {
    let mut rest = line;
    let mut channels = [0u8; 3];
    for (slot, what) in channels.iter_mut().zip(["red", "green", "blue"]) {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..end];
        if token.is_empty() {
            return Err(format!("missing {what} channel"));
        }
        let value: u32 = token
            .parse()
            .map_err(|_| format!("{what} channel '{token}' is not an integer"))?;
        *slot = u8::try_from(value).map_err(|_| format!("{what} channel {value} exceeds 255"))?;
        rest = &rest[end..];
    }
    let [r, g, b] = channels;
    let mut swatch = Swatch::new(Color::rgb(r, g, b));
    let name = rest.trim();
    if !name.is_empty() {
        swatch.name = Some(name.to_string());
    }
    Ok(swatch)
}

pub(crate) fn encode(palette: &Palette) -> String {
    if palette.iter().any(|s| s.color.a.is_some()) {
        log::warn!("GPL has no alpha channel; alpha dropped");
    }
    let mut out = format!("{MAGIC}\nName: {}\n#\n", single_line(&palette.name));
    for swatch in palette {
        let c = swatch.color;
        out.push_str(&format!("{:>3} {:>3} {:>3}", c.r, c.g, c.b));
        if let Some(name) = &swatch.name {
            out.push('\t');
            out.push_str(&single_line(name));
        }
        out.push('\n');
    }
    out
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_aligns_channels() {
        let mut p = Palette::new("Pastels");
        p.push(Swatch::new(Color::rgb(255, 0, 7)).named("Coral"));
        p.push(Color::rgb(10, 200, 30));
        let text = encode(&p);
        assert_eq!(
            text,
            "GIMP Palette\nName: Pastels\n#\n255   0   7\tCoral\n 10 200  30\n"
        );
    }

    #[test]
    fn decode_tolerates_comments_and_blank_lines() {
        let text = "\nGIMP Palette\nName: Sea\nColumns: 4\n# a comment\n\n  0 128 255 Deep Blue\n12 34 56\n";
        let p = decode(text).unwrap();
        assert_eq!(p.name, "Sea");
        assert_eq!(p.colors(), vec![Color::rgb(0, 128, 255), Color::rgb(12, 34, 56)]);
        assert_eq!(p.get(0).unwrap().name.as_deref(), Some("Deep Blue"));
        assert_eq!(p.get(1).unwrap().name, None);
    }

    #[test]
    fn missing_header_is_malformed_on_its_line() {
        let err = decode("\n\nJASC-PAL\n").unwrap_err();
        assert!(matches!(
            err,
            ColorError::MalformedPalette {
                at: Location::Line(3),
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_channel_reports_line() {
        let err = decode("GIMP Palette\n1 2 3\n1 256 3\n").unwrap_err();
        match err {
            ColorError::MalformedPalette { at, reason } => {
                assert_eq!(at, Location::Line(3));
                assert!(reason.contains("256"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_line_is_malformed() {
        assert!(decode("GIMP Palette\n1 2\n").is_err());
        assert!(decode("GIMP Palette\n1 2 x\n").is_err());
    }

    #[test]
    fn empty_document_is_malformed() {
        assert!(decode("").is_err());
    }

    #[test]
    fn round_trip() {
        let mut p = Palette::new("Round");
        p.push(Swatch::new(Color::rgb(1, 2, 3)).named("one two"));
        p.push(Color::rgb(250, 251, 252));
        let decoded = decode(&encode(&p)).unwrap();
        assert_eq!(decoded.name, "Round");
        assert_eq!(decoded.colors(), p.colors());
        assert_eq!(decoded.get(0).unwrap().name.as_deref(), Some("one two"));
    }
}
