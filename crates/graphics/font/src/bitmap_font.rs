use crate::Font;

/// Number of rows in every glyph
const GLYPH_HEIGHT: usize = 7;

/// Rows of a glyph, the most significant of the low five bits is the leftmost column
type Rows = [u8; GLYPH_HEIGHT];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Glyph {
    width: usize,
    rows: Rows,
}

const fn glyph(width: usize, rows: Rows) -> Glyph {
    Glyph { width, rows }
}

/// Drawn for characters the font knows nothing about
const REPLACEMENT: Glyph = glyph(
    5,
    [
        0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
    ],
);

/// The built-in 5x7 pixel font
///
/// Covers ASCII letters, digits and common punctuation. Lowercase letters
/// are drawn using their uppercase glyphs and every other character renders
/// as an empty box.
#[derive(Clone, Copy, Debug)]
pub struct BitmapFont {
    /// Empty rows between two lines of text
    line_spacing: usize,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmapFont {
    #[must_use]
    pub const fn new() -> Self {
        Self { line_spacing: 1 }
    }

    #[must_use]
    pub const fn with_line_spacing(line_spacing: usize) -> Self {
        Self { line_spacing }
    }

    /// Whether the font has a dedicated glyph for `character`
    #[must_use]
    pub fn covers(&self, character: char) -> bool {
        lookup(character).is_some()
    }

    fn glyph(&self, character: char) -> Glyph {
        lookup(character).unwrap_or(REPLACEMENT)
    }
}

impl Font for BitmapFont {
    fn height(&self) -> usize {
        GLYPH_HEIGHT + self.line_spacing
    }

    fn char_width(&self, character: char) -> usize {
        self.glyph(character).width
    }

    fn char_spacing(&self, _character: char) -> usize {
        1
    }

    fn glyph_pixel(&self, character: char, x: usize, y: usize) -> bool {
        let glyph = self.glyph(character);
        if x >= glyph.width || y >= GLYPH_HEIGHT {
            return false;
        }

        glyph.rows[y] & (0b10000 >> x) != 0
    }
}

#[rustfmt::skip]
fn lookup(character: char) -> Option<Glyph> {
    let glyph = match character.to_ascii_uppercase() {
        ' ' => glyph(3, [0, 0, 0, 0, 0, 0, 0]),
        'A' => glyph(5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => glyph(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => glyph(5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => glyph(5, [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => glyph(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => glyph(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => glyph(5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => glyph(5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => glyph(3, [0b11100, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b11100]),
        'J' => glyph(5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => glyph(5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => glyph(5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => glyph(5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => glyph(5, [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
        'O' => glyph(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => glyph(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => glyph(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => glyph(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => glyph(5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => glyph(5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => glyph(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => glyph(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => glyph(5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
        'X' => glyph(5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => glyph(5, [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
        'Z' => glyph(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => glyph(5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => glyph(3, [0b01000, 0b11000, 0b01000, 0b01000, 0b01000, 0b01000, 0b11100]),
        '2' => glyph(5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => glyph(5, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => glyph(5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => glyph(5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => glyph(5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => glyph(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => glyph(5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => glyph(5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '.' => glyph(2, [0, 0, 0, 0, 0, 0b11000, 0b11000]),
        ',' => glyph(2, [0, 0, 0, 0, 0b11000, 0b01000, 0b10000]),
        ':' => glyph(2, [0, 0b11000, 0b11000, 0, 0b11000, 0b11000, 0]),
        ';' => glyph(2, [0, 0b11000, 0b11000, 0, 0b11000, 0b01000, 0b10000]),
        '!' => glyph(1, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0, 0b10000]),
        '\'' => glyph(1, [0b10000, 0b10000, 0, 0, 0, 0, 0]),
        '"' => glyph(3, [0b10100, 0b10100, 0, 0, 0, 0, 0]),
        '?' => glyph(5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100]),
        '-' => glyph(4, [0, 0, 0, 0b11110, 0, 0, 0]),
        '+' => glyph(5, [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0]),
        '=' => glyph(4, [0, 0, 0b11110, 0, 0b11110, 0, 0]),
        '*' => glyph(5, [0, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0]),
        '/' => glyph(5, [0, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0]),
        '_' => glyph(5, [0, 0, 0, 0, 0, 0, 0b11111]),
        '#' => glyph(5, [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010]),
        '%' => glyph(5, [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
        '(' => glyph(3, [0b00100, 0b01000, 0b10000, 0b10000, 0b10000, 0b01000, 0b00100]),
        ')' => glyph(3, [0b10000, 0b01000, 0b00100, 0b00100, 0b00100, 0b01000, 0b10000]),
        '[' => glyph(3, [0b11100, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11100]),
        ']' => glyph(3, [0b11100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11100]),
        '<' => glyph(4, [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010]),
        '>' => glyph(4, [0b10000, 0b01000, 0b00100, 0b00010, 0b00100, 0b01000, 0b10000]),
        _ => return None,
    };
    Some(glyph)
}
