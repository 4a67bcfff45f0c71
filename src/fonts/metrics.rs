//! Text encoding and advance widths for the built-in PDF fonts.
//!
//! Text is written with WinAnsiEncoding, so every string goes through
//! [`encode_win_ansi`] before it reaches a content stream. The width tables are the
//! standard Helvetica metrics for the printable ASCII range, in 1000ths of the font size.

/// Fallback width for characters outside the tables.
const DEFAULT_WIDTH: u16 = 556;

/// Code points of WinAnsi bytes 0x80..=0x9F. Zero marks an unused slot.
const WIN_ANSI_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// The standard fonts the PDF backend can use without embedding anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    /// `Helvetica`.
    Helvetica,
    /// `Helvetica-Bold`.
    HelveticaBold,
    /// `Helvetica-Oblique`.
    HelveticaOblique,
    /// `Helvetica-BoldOblique`.
    HelveticaBoldOblique,
}

impl BuiltinFont {
    /// Every built-in font.
    pub const ALL: [BuiltinFont; 4] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
    ];

    /// PostScript name, which is also the logical name renderers use.
    pub fn name(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Looks a built-in font up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.name() == name)
    }

    /// Advance width of a WinAnsi byte in 1000ths of the font size.
    pub fn width_of(self, code: u8) -> u16 {
        let table = match self {
            Self::Helvetica | Self::HelveticaOblique => &HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &HELVETICA_BOLD,
        };
        code.checked_sub(32)
            .and_then(|index| table.get(usize::from(index)))
            .copied()
            .unwrap_or(DEFAULT_WIDTH)
    }
}

/// Maps a WinAnsi byte back to the character it encodes.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
        0x80..=0x9F => match WIN_ANSI_HIGH[usize::from(code - 0x80)] {
            0 => None,
            point => char::from_u32(point),
        },
        _ => None,
    }
}

/// Encodes text as WinAnsi bytes. Characters without a WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            point @ (0x20..=0x7E | 0xA0..=0xFF) => point as u8,
            point => WIN_ANSI_HIGH
                .iter()
                .position(|&candidate| candidate != 0 && candidate == point)
                .map(|index| 0x80 + index as u8)
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Width of already-encoded text, in render units, for a font of `size` whose glyph
/// widths are given by `width_of`.
pub fn encoded_width(encoded: &[u8], size: f64, width_of: impl Fn(u8) -> u16) -> f64 {
    let units: u32 = encoded.iter().map(|&code| u32::from(width_of(code))).sum();
    f64::from(units) * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        assert_eq!(encode_win_ansi("Page 12"), b"Page 12".to_vec());
        assert_eq!(win_ansi_char(b'A'), Some('A'));
    }

    #[test]
    fn typographic_quotes_use_high_range() {
        assert_eq!(encode_win_ansi("\u{2019}"), vec![0x92]);
        assert_eq!(win_ansi_char(0x92), Some('\u{2019}'));
        assert_eq!(encode_win_ansi("\u{20AC}"), vec![0x80]);
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("\u{65E5}"), b"?".to_vec());
        assert_eq!(win_ansi_char(0x81), None);
    }

    #[test]
    fn helvetica_widths() {
        assert_eq!(BuiltinFont::Helvetica.width_of(b' '), 278);
        assert_eq!(BuiltinFont::Helvetica.width_of(b'W'), 944);
        assert_eq!(BuiltinFont::HelveticaBold.width_of(b'b'), 611);
        let width = encoded_width(b"The End", 10.0, |code| {
            BuiltinFont::Helvetica.width_of(code)
        });
        // T h e space E n d = 611 + 556 + 556 + 278 + 667 + 556 + 556
        assert!((width - 37.8).abs() < 1e-9);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(
            BuiltinFont::from_name("Helvetica-Oblique"),
            Some(BuiltinFont::HelveticaOblique)
        );
        assert_eq!(BuiltinFont::from_name("Comic Sans"), None);
    }
}
