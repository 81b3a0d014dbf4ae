#![deny(unsafe_code)]
//! Color science core for pigment.
//!
//! Provides the `Color` value type with conversions between RGB, HEX, HSL,
//! HSV, CMYK, XYZ and LAB; WCAG contrast analysis and color-vision
//! deficiency simulation; harmony generation; dominant-color extraction
//! and averaging over a `PixelSample`; nearest-color lookup; and the
//! `Palette` model shared by the codecs.
//!
//! Every operation is a synchronous pure function over its inputs.

pub mod accessibility;
pub mod average;
pub mod color;
pub mod error;
pub mod extract;
pub mod format;
pub mod harmony;
pub mod palette;
pub mod params;
pub mod sample;
pub mod similar;
pub mod vision;

pub use accessibility::{contrast_ratio, AccessibilityReport, TextSize, WcagLevel};
pub use average::{average_color, AverageMethod};
pub use color::{Cmyk, Color, ColorModel, Hsl, Hsv, Lab, LinearRgb, Xyz};
pub use error::{ColorError, Location};
pub use extract::{extract_dominant, DominantColor, ExtractOptions};
pub use format::Format;
pub use harmony::{harmony, HarmonyKind, HarmonyResult};
pub use palette::{Palette, Swatch};
pub use sample::PixelSample;
pub use similar::{find_similar, SimilarColor};
pub use vision::{simulate, Deficiency, PaletteAudit, SimulationOptions};
