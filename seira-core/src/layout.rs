//! Text layout engine
//!
//! Maps a string plus alignment mode and character width onto frame buffer
//! columns. The alignment offset positions the text as a whole; the live
//! scroll offset shifts it per animation tick. Off-screen glyph columns
//! are culled by the frame buffer's silent bounds clamp.

use crate::frame::FrameBuffer;
use crate::traits::GlyphSource;

/// Text alignment policies
///
/// `W` below is the display width in pixels (`8 * device_count`),
/// `len(text) * w` the text width at character width `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    /// Text starts at the left edge of the display (offset 0)
    Left,
    /// Text starts just past the right edge, entering from the right on a
    /// leftward scroll (offset `W`)
    #[default]
    LeftEnd,
    /// End of text aligned to the right edge (offset `len(text)*w - W`)
    Right,
    /// End of text just outside the left edge (offset `-len(text)*w`)
    RightEnd,
}

impl Alignment {
    /// Alignment offset in pixels for a text of `text_width` pixels on a
    /// display of `display_width` pixels
    ///
    /// Zero-width text yields 0 for every mode: with nothing to draw,
    /// alignment-dependent offsets are disabled rather than computed from
    /// a degenerate length.
    pub fn offset(self, text_width: i32, display_width: i32) -> i32 {
        if text_width == 0 {
            return 0;
        }
        match self {
            Alignment::Left => 0,
            Alignment::LeftEnd => display_width,
            Alignment::Right => text_width - display_width,
            Alignment::RightEnd => -text_width,
        }
    }
}

/// Draw `text` into the frame buffer
///
/// Character `i`, glyph column `c` lands at
/// `i * char_width + c + scroll_offset + align_offset`. Columns that fall
/// outside the display are dropped by [`FrameBuffer::set_column`].
pub fn draw_text<G: GlyphSource>(
    frame: &mut FrameBuffer,
    glyphs: &G,
    text: &str,
    char_width: u8,
    scroll_offset: i32,
    align_offset: i32,
) {
    for (index, ch) in text.chars().enumerate() {
        let glyph = glyphs.glyph(ch);
        let glyph_base = index as i32 * char_width as i32 + scroll_offset + align_offset;
        for (col, &value) in glyph.iter().enumerate() {
            frame.set_column(glyph_base + col as i32, value);
        }
    }
}
