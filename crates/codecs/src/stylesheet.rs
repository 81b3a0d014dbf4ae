//! Stylesheet variable palettes: CSS custom properties, SCSS, Sass and LESS
//! variables.
//!
//! Every dialect is written as one declaration per swatch with an
//! uppercase `#RRGGBB` value (`#RRGGBBAA` when the swatch carries alpha) and
//! a `Palette: <name>` header comment. Decoding accepts any declaration of
//! the dialect's variable kind whose value is `#RGB`, `#RRGGBB`,
//! `#RRGGBBAA`, `rgb()` or `rgba()`; other declarations are skipped.

use pigment_core::color::Color;
use pigment_core::error::{ColorError, Location};
use pigment_core::format::Format;
use pigment_core::palette::{Palette, Swatch};

const HEADER: &str = "Palette:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// `--name: value;` inside `:root { }`.
    Css,
    /// `$name: value;`, with `//` line comments.
    Scss,
    /// `$name: value`, one per line, with `//` line comments.
    Sass,
    /// `@name: value;`, with `//` line comments.
    Less,
}

impl Dialect {
    fn sigil(self) -> &'static str {
        match self {
            Dialect::Css => "--",
            Dialect::Scss | Dialect::Sass => "$",
            Dialect::Less => "@",
        }
    }

    fn format(self) -> Format {
        match self {
            Dialect::Css => Format::Css,
            Dialect::Scss => Format::Scss,
            Dialect::Sass => Format::Sass,
            Dialect::Less => Format::Less,
        }
    }

    fn line_comments(self) -> bool {
        self != Dialect::Css
    }

    /// Sass ends a declaration at the line break.
    fn newline_terminates(self) -> bool {
        self == Dialect::Sass
    }
}

pub(crate) fn decode(text: &str, dialect: Dialect) -> Result<Palette, ColorError> {
    let (code, comments) = strip_comments(text, dialect.line_comments());
    let name = comments
        .iter()
        .find_map(|c| c.trim().strip_prefix(HEADER))
        .map(|n| n.trim().to_string())
        .unwrap_or_default();
    let mut palette = Palette::new(name).with_source(dialect.format());

    for (line, statement) in statements(&code, dialect.newline_terminates()) {
        let Some((var, value)) = declaration(statement, dialect) else {
            log::debug!("line {line}: skipping '{statement}'");
            continue;
        };
        // Drop `!default`, `!important` and similar flags.
        let value = value.split('!').next().unwrap_or_default().trim();
        if value.is_empty() {
            log::warn!("line {line}: variable without a value");
            continue;
        }
        match parse_color_value(value) {
            Ok(Some(color)) if var.is_empty() => palette.push(color),
            Ok(Some(color)) => palette.push(Swatch::new(color).named(var)),
            Ok(None) => log::warn!("line {line}: skipping non-color variable {var}"),
            Err(reason) => {
                return Err(ColorError::malformed(
                    Location::Line(line),
                    format!("{}{var}: {reason}", dialect.sigil()),
                ))
            }
        }
    }
    log::debug!("decoded {} {} variables", palette.len(), dialect.format());
    Ok(palette)
}

/// Splits `<sigil><name>: <value>` into trimmed name and raw value. At-rules
/// and other statements whose name holds whitespace are not declarations.
fn declaration(statement: &str, dialect: Dialect) -> Option<(&str, &str)> {
    let (var, value) = statement.strip_prefix(dialect.sigil())?.split_once(':')?;
    let var = var.trim();
    if var.contains(char::is_whitespace) {
        return None;
    }
    Some((var, value))
}

/// Guesses the dialect of stylesheet text from its first variable
/// declaration, ignoring comments.
pub(crate) fn sniff(text: &str) -> Option<Format> {
    let (code, _) = strip_comments(text, true);
    let has_semicolons = code.contains(';');
    statements(&code, true)
        .into_iter()
        .find_map(|(_, statement)| {
            [Dialect::Css, Dialect::Scss, Dialect::Less]
                .into_iter()
                .find(|&d| declaration(statement, d).is_some())
        })
        .map(|dialect| match dialect {
            Dialect::Scss if !has_semicolons => Format::Sass,
            d => d.format(),
        })
}

pub(crate) fn encode(palette: &Palette, dialect: Dialect) -> String {
    let title = palette.name.replace("*/", "* /").replace(['\r', '\n'], " ");
    let (mut out, indent) = match dialect {
        Dialect::Css => (format!("/* {HEADER} {title} */\n:root {{\n"), "  "),
        _ => (format!("// {HEADER} {title}\n"), ""),
    };
    let terminator = if dialect.newline_terminates() { "" } else { ";" };
    for i in 0..palette.len() {
        out.push_str(&format!(
            "{indent}{}{}: {}{terminator}\n",
            dialect.sigil(),
            identifier(palette, i),
            hex(palette, i)
        ));
    }
    if dialect == Dialect::Css {
        out.push_str("}\n");
    }
    out
}

fn hex(palette: &Palette, i: usize) -> String {
    palette.get(i).map(|s| s.color.to_hex()).unwrap_or_default()
}

/// Entry name reduced to identifier characters; unnamed or blank entries
/// are `color-N`.
fn identifier(palette: &Palette, i: usize) -> String {
    let ident: String = palette
        .display_name(i)
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("color-{ident}")
    } else {
        ident
    }
}

/// Parses a declaration value; `Ok(None)` means "not a color notation we read".
fn parse_color_value(value: &str) -> Result<Option<Color>, String> {
    let lower = value.to_ascii_lowercase();
    if value.starts_with('#') {
        return Color::from_hex(value).map(Some).map_err(|e| e.to_string());
    }
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        return parse_rgb_function(value).map(Some);
    }
    Ok(None)
}

/// `rgb(r, g, b)`, `rgba(r, g, b, a)` and the space/slash form `rgb(r g b / a)`.
/// Channels are 0–255 or percentages; alpha is 0–1 or a percentage.
fn parse_rgb_function(value: &str) -> Result<Color, String> {
    let inner = value
        .find('(')
        .and_then(|open| value[open + 1..].strip_suffix(')'))
        .ok_or_else(|| format!("unterminated '{value}'"))?;
    let args: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();
    if args.len() != 3 && args.len() != 4 {
        return Err(format!("expected 3 or 4 components in '{value}'"));
    }

    let mut channels = [0u8; 3];
    for (slot, arg) in channels.iter_mut().zip(&args) {
        let v = match arg.strip_suffix('%') {
            Some(pct) => number(pct)? / 100.0 * 255.0,
            None => number(arg)?,
        };
        if !(0.0..=255.0).contains(&v) {
            return Err(format!("channel {arg} exceeds 255"));
        }
        *slot = v.round() as u8;
    }
    let [r, g, b] = channels;

    match args.get(3) {
        None => Ok(Color::rgb(r, g, b)),
        Some(arg) => {
            let a = match arg.strip_suffix('%') {
                Some(pct) => number(pct)? / 100.0,
                None => number(arg)?,
            };
            if !(0.0..=1.0).contains(&a) {
                return Err(format!("alpha {arg} outside 0..1"));
            }
            Ok(Color::rgba(r, g, b, (a * 255.0).round() as u8))
        }
    }
}

fn number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{s}' is not a number"))
}

/// Blanks out comments, keeping newlines so line numbers stay valid.
/// Returns the stripped source and the text of each comment.
fn strip_comments(src: &str, line_comments: bool) -> (String, Vec<String>) {
    let mut out = String::with_capacity(src.len());
    let mut comments = Vec::new();
    let mut chars = src.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match (c, chars.peek().copied()) {
            ('"' | '\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut body = String::new();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                    if prev == '*' && c == '/' {
                        body.pop();
                        break;
                    }
                    body.push(c);
                    prev = c;
                }
                comments.push(body);
            }
            ('/', Some('/')) if line_comments => {
                let mut body = String::new();
                out.push(' ');
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    body.push(c);
                    out.push(' ');
                    chars.next();
                }
                comments.push(body.trim_start_matches('/').to_string());
            }
            _ => out.push(c),
        }
    }
    (out, comments)
}

/// Splits on `;`, `{` and `}` (and line breaks when `newline_ends`) outside
/// quotes. Each statement is trimmed and paired with the 1-based line where
/// it starts.
fn statements(code: &str, newline_ends: bool) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut line = 1;
    let mut start: Option<(usize, usize)> = None;
    let mut quote: Option<char> = None;

    for (i, c) in code.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                c if matches!(c, ';' | '{' | '}') || (newline_ends && c == '\n') => {
                    if let Some((from, at)) = start.take() {
                        result.push((at, code[from..i].trim()));
                    }
                }
                c if c.is_whitespace() => {}
                c => {
                    if c == '"' || c == '\'' {
                        quote = Some(c);
                    }
                    start.get_or_insert((i, line));
                }
            },
        }
        if c == '\n' {
            line += 1;
        }
    }
    if let Some((from, at)) = start {
        result.push((at, code[from..].trim()));
    }
    result
}
