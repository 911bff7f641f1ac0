//! The shared color palette consulted when decoding palette-indexed block
//! colors.
//!
//! Loaded once at startup from a text file holding one hexadecimal `RRGGBB`
//! color per line, then passed by reference (typically `Arc`) to the call
//! sites that need it. A missing file keeps the default palette; a malformed
//! line is a fatal configuration error for the caller to handle.

use std::io;
use std::path::Path;

use tracing::warn;

/// Color returned for palette indices past the end of the palette.
const FALLBACK_COLOR: [u8; 4] = [255, 0, 255, 255];

/// Built-in palette used when no palette file is configured or present.
const DEFAULT_COLORS: [[u8; 4]; 8] = [
    [46, 34, 47, 255],
    [98, 85, 101, 255],
    [150, 152, 170, 255],
    [251, 251, 244, 255],
    [62, 137, 72, 255],
    [99, 171, 63, 255],
    [139, 109, 156, 255],
    [251, 185, 84, 255],
];

/// Errors raised while loading a palette file.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    /// The file existed but could not be read.
    #[error("failed to read palette file: {0}")]
    Read(#[source] io::Error),

    /// A line was not a six-digit hexadecimal color.
    #[error("invalid palette color {value:?} on line {line}")]
    InvalidColor {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        value: String,
    },
}

/// An ordered, immutable list of RGBA colors indexed by palette-index blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<[u8; 4]>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl ColorPalette {
    /// Creates a palette from explicit colors.
    pub fn from_colors(colors: Vec<[u8; 4]>) -> Self {
        Self { colors }
    }

    /// Loads a palette from a file of one `RRGGBB` hex color per line.
    ///
    /// A missing file is not an error: the default palette is returned and a
    /// warning logged. Any malformed line is fatal.
    pub fn load(path: &Path) -> Result<Self, PaletteError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "palette file not found, keeping default palette");
                return Ok(Self::default());
            }
            Err(err) => return Err(PaletteError::Read(err)),
        };
        Self::parse(&text)
    }

    /// Parses palette text: one `RRGGBB` value per line, blank lines ignored.
    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        let mut colors = Vec::new();
        for (line_index, line) in text.lines().enumerate() {
            let value = line.trim();
            if value.is_empty() {
                continue;
            }
            let parsed = if value.len() == 6 {
                u32::from_str_radix(value, 16).ok()
            } else {
                None
            };
            let Some(rgb) = parsed else {
                return Err(PaletteError::InvalidColor {
                    line: line_index + 1,
                    value: value.to_string(),
                });
            };
            colors.push([
                ((rgb >> 16) & 0xFF) as u8,
                ((rgb >> 8) & 0xFF) as u8,
                (rgb & 0xFF) as u8,
                255,
            ]);
        }
        Ok(Self { colors })
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the palette holds no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the color at `index`, or an opaque fallback if out of range.
    pub fn color(&self, index: usize) -> [u8; 4] {
        self.colors.get(index).copied().unwrap_or(FALLBACK_COLOR)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_preserves_order_and_values() {
        let palette = ColorPalette::parse("2E222F\n00FF00\nFFFFFF\n").expect("valid palette");
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.color(0), [0x2E, 0x22, 0x2F, 255]);
        assert_eq!(palette.color(1), [0, 255, 0, 255]);
        assert_eq!(palette.color(2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let palette = ColorPalette::parse("AABBCC\n\n  \n112233\n").expect("valid palette");
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let err = ColorPalette::parse("AABBCC\nnot-hex\n").expect_err("must fail");
        match err {
            PaletteError::InvalidColor { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "not-hex");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_length_is_fatal() {
        assert!(ColorPalette::parse("FFF\n").is_err());
        assert!(ColorPalette::parse("AABBCCDD\n").is_err());
    }

    #[test]
    fn test_missing_file_keeps_default() {
        let palette =
            ColorPalette::load(Path::new("/definitely/not/a/palette.hex")).expect("non-fatal");
        assert_eq!(palette, ColorPalette::default());
    }

    #[test]
    fn test_file_round_trip() {
        let colors = ["102030", "405060", "708090", "A0B0C0"];
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        for color in colors {
            writeln!(file, "{color}").expect("write");
        }

        let palette = ColorPalette::load(file.path()).expect("load");
        assert_eq!(palette.len(), colors.len());
        assert_eq!(palette.color(0), [0x10, 0x20, 0x30, 255]);
        assert_eq!(palette.color(3), [0xA0, 0xB0, 0xC0, 255]);
    }

    #[test]
    fn test_out_of_range_index_is_fallback() {
        let palette = ColorPalette::from_colors(vec![[1, 2, 3, 255]]);
        assert_eq!(palette.color(7), FALLBACK_COLOR);
    }
}
