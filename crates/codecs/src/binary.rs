//! Big-endian cursor and writers shared by the binary Adobe formats.
//!
//! Every read failure is reported as `MalformedPalette` at the absolute
//! byte offset where the missing or bad data starts.

use pigment_core::error::{ColorError, Location};

pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self::at(bytes, 0)
    }

    /// A reader over a slice that starts `base` bytes into the whole buffer.
    pub(crate) fn at(bytes: &'a [u8], base: usize) -> Self {
        Self {
            bytes,
            pos: 0,
            base,
        }
    }

    /// Absolute offset of the next unread byte.
    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> ColorError {
        ColorError::malformed(Location::Offset(self.offset()), reason)
    }

    pub(crate) fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], ColorError> {
        if n > self.remaining() {
            return Err(self.error(format!(
                "truncated {what}: need {n} bytes, {} left",
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn u16(&mut self, what: &str) -> Result<u16, ColorError> {
        let b = self.take(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self, what: &str) -> Result<u32, ColorError> {
        let b = self.take(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn f32(&mut self, what: &str) -> Result<f32, ColorError> {
        let at = self.offset();
        let b = self.take(4, what)?;
        let v = f32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        if !v.is_finite() {
            return Err(ColorError::malformed(
                Location::Offset(at),
                format!("{what} is not a finite number"),
            ));
        }
        Ok(v)
    }

    /// Reads `units` UTF-16BE code units and drops trailing NULs.
    pub(crate) fn utf16(&mut self, units: usize, what: &str) -> Result<String, ColorError> {
        let at = self.offset();
        let len = units
            .checked_mul(2)
            .ok_or_else(|| self.error(format!("{what} length overflows")))?;
        let raw = self.take(len, what)?;
        let code_units = raw.chunks_exact(2).map(|p| u16::from_be_bytes([p[0], p[1]]));
        let text: String = char::decode_utf16(code_units)
            .collect::<Result<_, _>>()
            .map_err(|_| ColorError::malformed(Location::Offset(at), format!("{what} is not valid UTF-16")))?;
        Ok(text.trim_end_matches('\0').to_string())
    }
}

pub(crate) fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub(crate) fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// UTF-16BE encoding of `s` followed by a NUL unit.
pub(crate) fn utf16_nul(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub(crate) fn put_utf16(out: &mut Vec<u8>, units: &[u16]) {
    for &u in units {
        put_u16(out, u);
    }
}

/// Converts a length to a narrower integer field, naming the field on overflow.
pub(crate) fn fits<T: TryFrom<usize>>(n: usize, what: &'static str) -> Result<T, ColorError> {
    T::try_from(n).map_err(|_| ColorError::range(what, n as f64))
}

/// Unit float to an 8-bit channel, saturating.
pub(crate) fn unit_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
