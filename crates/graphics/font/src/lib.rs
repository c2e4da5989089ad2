//! Fonts for drawing text onto small pixel displays.
//!
//! Glyphs are monochrome bitmaps, the color is chosen by whoever draws them.

mod bitmap_font;

pub use bitmap_font::BitmapFont;

/// A source of monochrome glyphs
pub trait Font {
    /// Distance between two baselines, in pixels
    fn height(&self) -> usize;

    /// Width of the glyph for `character`, in pixels
    fn char_width(&self, character: char) -> usize;

    /// Empty columns inserted after `character` before the next glyph starts
    fn char_spacing(&self, character: char) -> usize;

    /// Whether the pixel at `(x, y)` inside the glyph for `character` is set
    ///
    /// Coordinates outside of the glyph are never set.
    fn glyph_pixel(&self, character: char, x: usize, y: usize) -> bool;

    /// Horizontal advance of `character`, the width plus the spacing after it
    fn advance(&self, character: char) -> usize {
        self.char_width(character) + self.char_spacing(character)
    }

    /// Width of a single line of text, without trailing spacing
    fn text_width(&self, text: &str) -> usize {
        let total: usize = text.chars().map(|c| self.advance(c)).sum();
        total.saturating_sub(text.chars().last().map_or(0, |c| self.char_spacing(c)))
    }
}
