//! Display facade
//!
//! Ties the frame buffer, text layout, scroll state machine and transport
//! together behind one owner. The facade is a single-writer structure:
//! the host drives [`tick`](MatrixDisplay::tick) from its timer facility,
//! and exclusive `&mut` access guarantees a tick can never observe or
//! expose a partially built frame.

use heapless::String;

use crate::config::{ConfigError, DisplayConfig, MAX_TEXT_LEN};
use crate::frame::FrameBuffer;
use crate::layout::{self, Alignment};
use crate::scroll::{ScrollMode, Scroller};
use crate::traits::{GlyphSource, Transport};

/// Text display across a chain of cascaded 8x8 LED matrices
///
/// Generic over the transport `T` (the physical bus adapter) and the
/// glyph source `G` (the font). Both are injected at construction and
/// owned by the display.
pub struct MatrixDisplay<T, G> {
    transport: T,
    glyphs: G,
    frame: FrameBuffer,
    text: String<MAX_TEXT_LEN>,
    next_text: String<MAX_TEXT_LEN>,
    scroller: Scroller,
    mode: ScrollMode,
    alignment: Alignment,
    align_offset: i32,
    char_width: u8,
    rotation: bool,
}

impl<T: Transport, G: GlyphSource> MatrixDisplay<T, G> {
    /// Build a display for a validated configuration
    ///
    /// Configuration errors are fatal: no buffer is allocated and no
    /// device write is issued. The configured intensity is forwarded to
    /// the devices once, here.
    pub fn new(transport: T, glyphs: G, config: &DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut display = Self {
            transport,
            glyphs,
            frame: FrameBuffer::new(config.device_count),
            text: String::new(),
            next_text: String::new(),
            scroller: Scroller::new(),
            mode: ScrollMode::Idle,
            alignment: config.alignment,
            align_offset: 0,
            char_width: config.char_width,
            rotation: config.rotation,
        };
        display.transport.set_intensity(config.intensity);
        Ok(display)
    }

    /// Currently displayed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text queued to replace the current text after a left-scroll cycle
    pub fn next_text(&self) -> &str {
        &self.next_text
    }

    /// Live scroll offset in pixels
    pub fn scroll_offset(&self) -> i32 {
        self.scroller.offset()
    }

    /// Derived alignment offset in pixels
    pub fn alignment_offset(&self) -> i32 {
        self.align_offset
    }

    /// Read access to the frame buffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Current animation mode
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    fn text_width(&self) -> i32 {
        self.text.chars().count() as i32 * self.char_width as i32
    }

    fn display_width(&self) -> i32 {
        self.frame.len() as i32
    }

    fn recompute_alignment(&mut self) {
        self.align_offset = self
            .alignment
            .offset(self.text_width(), self.display_width());
    }

    /// Set the displayed text (copied, truncated at [`MAX_TEXT_LEN`])
    ///
    /// Resets the scroll offset to zero and recomputes the alignment
    /// offset immediately, so neither ever references a stale length.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
        self.scroller.reset();
        self.recompute_alignment();
    }

    /// Queue text to take over once the current left-scroll cycle completes
    pub fn set_next_text(&mut self, text: &str) {
        self.next_text.clear();
        for ch in text.chars() {
            if self.next_text.push(ch).is_err() {
                break;
            }
        }
    }

    /// Change the alignment policy and recompute the alignment offset
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.recompute_alignment();
    }

    /// Change the character width and recompute the alignment offset
    ///
    /// A width of zero would degenerate the scroll moduli and is ignored.
    pub fn set_char_width(&mut self, char_width: u8) {
        if char_width == 0 {
            return;
        }
        self.char_width = char_width;
        self.recompute_alignment();
    }

    /// Enable or disable the 90-degree rotation transform
    pub fn set_rotation(&mut self, enabled: bool) {
        self.rotation = enabled;
    }

    /// Forward an intensity level (0-15) verbatim to the devices
    pub fn set_intensity(&mut self, level: u8) {
        self.transport.set_intensity(level);
    }

    /// Zero the frame buffer
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Write a full column byte (out-of-range columns are dropped)
    pub fn set_column(&mut self, column: i32, value: u8) {
        self.frame.set_column(column, value);
    }

    /// Turn on a single pixel (out-of-range writes are dropped)
    pub fn set_pixel(&mut self, column: i32, row: u8) {
        self.frame.set_pixel(column, row);
    }

    /// Redraw the current text into the frame buffer
    ///
    /// Does not clear first; animation frames call [`clear`](Self::clear)
    /// themselves so callers can overlay pixels when static.
    pub fn draw(&mut self) {
        layout::draw_text(
            &mut self.frame,
            &self.glyphs,
            &self.text,
            self.char_width,
            self.scroller.offset(),
            self.align_offset,
        );
    }

    /// Transmit the frame buffer to the devices
    ///
    /// Applies the rotation transform first when enabled, then hands
    /// every column to the transport as `(device = col/8, register =
    /// col%8 + 1)`. Transport failures are the adapter's concern and are
    /// never surfaced here.
    pub fn commit(&mut self) {
        if self.rotation {
            self.frame.rotate();
        }
        for (col, &value) in self.frame.columns().iter().enumerate() {
            self.transport
                .write_register((col / 8) as u8, (col % 8 + 1) as u8, value);
        }
    }

    /// Advance one pixel of leftward scroll
    ///
    /// When the scroll cycle completes (offset back at zero) and text is
    /// queued, the queued text takes over atomically: it becomes the
    /// display text, the queue empties and the alignment offset is
    /// recomputed - all before the next redraw.
    pub fn scroll_left(&mut self) {
        let text_width = self.text_width();
        let display_width = self.display_width();
        let cycle_complete = self.scroller.step_left(text_width, display_width);
        if cycle_complete && !self.next_text.is_empty() {
            core::mem::swap(&mut self.text, &mut self.next_text);
            self.next_text.clear();
            self.scroller.reset();
            self.recompute_alignment();
        }
    }

    /// Advance one pixel of rightward scroll
    pub fn scroll_right(&mut self) {
        let text_len = self.text.chars().count();
        let device_count = self.frame.device_count();
        self.scroller
            .step_right(text_len, device_count, self.char_width);
    }

    /// Advance one oscillation step (no-op when the text fits on screen)
    pub fn oscillate(&mut self) {
        let text_width = self.text_width();
        let display_width = self.display_width();
        self.scroller.oscillate(text_width, display_width);
    }

    /// Select the animation mode that [`tick`](Self::tick) runs
    pub fn start_animation(&mut self, mode: ScrollMode) {
        self.mode = mode;
    }

    /// Stop animating; subsequent ticks do nothing
    pub fn stop_animation(&mut self) {
        self.mode = ScrollMode::Idle;
    }

    /// Run one animation frame: clear, advance, redraw, commit
    ///
    /// One synchronous unit - no partial frame is ever exposed to the
    /// transport. Does nothing in [`ScrollMode::Idle`].
    pub fn tick(&mut self) {
        if self.mode == ScrollMode::Idle {
            return;
        }
        self.frame.clear();
        match self.mode {
            ScrollMode::Idle => (),
            ScrollMode::Left => self.scroll_left(),
            ScrollMode::Right => self.scroll_right(),
            ScrollMode::Oscillate => self.oscillate(),
        }
        self.draw();
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font5x7;
    use heapless::Vec;

    /// Transport that records every register write
    #[derive(Default)]
    struct RecordingTransport {
        writes: Vec<(u8, u8, u8), 512>,
        intensity: Option<u8>,
    }

    impl Transport for RecordingTransport {
        fn write_register(&mut self, device: u8, register: u8, value: u8) {
            let _ = self.writes.push((device, register, value));
        }

        fn set_intensity(&mut self, level: u8) {
            self.intensity = Some(level);
        }
    }

    fn display(config: &DisplayConfig) -> MatrixDisplay<RecordingTransport, Font5x7> {
        MatrixDisplay::new(RecordingTransport::default(), Font5x7, config).unwrap()
    }

    fn one_device() -> DisplayConfig {
        DisplayConfig {
            device_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = DisplayConfig {
            device_count: 0,
            ..Default::default()
        };
        assert!(MatrixDisplay::new(RecordingTransport::default(), Font5x7, &config).is_err());
    }

    #[test]
    fn test_intensity_forwarded_at_init() {
        let config = DisplayConfig {
            intensity: 7,
            ..Default::default()
        };
        let mut matrix = display(&config);
        assert_eq!(matrix.transport.intensity, Some(7));

        matrix.set_intensity(12);
        assert_eq!(matrix.transport.intensity, Some(12));
    }

    #[test]
    fn test_commit_addressing() {
        let mut matrix = display(&DisplayConfig {
            device_count: 2,
            ..Default::default()
        });
        matrix.set_column(0, 0x11);
        matrix.set_column(9, 0x22);
        matrix.commit();

        let writes = &matrix.transport.writes;
        assert_eq!(writes.len(), 16);
        // column 0 -> device 0, register 1; column 9 -> device 1, register 2
        assert_eq!(writes[0], (0, 1, 0x11));
        assert_eq!(writes[9], (1, 2, 0x22));
        // every register offset cycles 1..=8 per device
        for (col, write) in writes.iter().enumerate() {
            assert_eq!(write.0, (col / 8) as u8);
            assert_eq!(write.1, (col % 8 + 1) as u8);
        }
    }

    #[test]
    fn test_set_text_resets_scroll_and_alignment() {
        let mut matrix = display(&one_device());
        matrix.set_text("HI");
        // LeftEnd default: offset is the display width
        assert_eq!(matrix.alignment_offset(), 8);

        for _ in 0..3 {
            matrix.scroll_left();
        }
        assert_ne!(matrix.scroll_offset(), 0);

        matrix.set_text("HI");
        assert_eq!(matrix.scroll_offset(), 0);
        assert_eq!(matrix.alignment_offset(), 8);
    }

    #[test]
    fn test_identical_text_reproduces_identical_frame() {
        let mut matrix = display(&one_device());
        matrix.set_alignment(Alignment::Left);
        matrix.set_text("HI");
        matrix.clear();
        matrix.draw();
        let first: Vec<u8, 8> = matrix.frame().columns().iter().copied().collect();

        matrix.scroll_left();
        matrix.set_text("HI");
        matrix.clear();
        matrix.draw();
        assert_eq!(matrix.frame().columns(), &first[..]);
    }

    #[test]
    fn test_left_scroll_cycle_length() {
        // "AB", w=7, d=1: modulus 2*7 + 8 = 22
        let mut matrix = display(&one_device());
        matrix.set_text("AB");
        for _ in 0..22 {
            matrix.scroll_left();
        }
        assert_eq!(matrix.scroll_offset(), 0);
        for _ in 0..21 {
            matrix.scroll_left();
            assert_ne!(matrix.scroll_offset(), 0);
        }
    }

    #[test]
    fn test_hand_off_at_cycle_completion() {
        let mut matrix = display(&one_device());
        matrix.set_alignment(Alignment::Right);
        matrix.set_text("A");
        matrix.set_next_text("BC");
        // "A": text width 7, W 8 -> Right alignment offset -1
        assert_eq!(matrix.alignment_offset(), -1);

        // cycle length for "A": 1*7 + 8 = 15
        for _ in 0..14 {
            matrix.scroll_left();
            assert_eq!(matrix.text(), "A");
            assert_eq!(matrix.next_text(), "BC");
        }
        matrix.scroll_left();
        assert_eq!(matrix.text(), "BC");
        assert_eq!(matrix.next_text(), "");
        assert_eq!(matrix.scroll_offset(), 0);
        // alignment recomputed for "BC": 2*7 - 8 = 6
        assert_eq!(matrix.alignment_offset(), 6);
    }

    #[test]
    fn test_no_hand_off_without_queued_text() {
        let mut matrix = display(&one_device());
        matrix.set_text("A");
        for _ in 0..30 {
            matrix.scroll_left();
        }
        assert_eq!(matrix.text(), "A");
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut matrix = display(&one_device());
        matrix.set_text("A");
        matrix.tick();
        assert!(matrix.transport.writes.is_empty());
        assert_eq!(matrix.scroll_offset(), 0);
    }

    #[test]
    fn test_tick_runs_full_frame() {
        let mut matrix = display(&one_device());
        matrix.set_text("A");
        matrix.start_animation(ScrollMode::Left);
        matrix.tick();
        // advanced one pixel and committed all 8 columns
        assert_eq!(matrix.scroll_offset(), -1);
        assert_eq!(matrix.transport.writes.len(), 8);

        matrix.stop_animation();
        matrix.tick();
        assert_eq!(matrix.transport.writes.len(), 8);
    }

    #[test]
    fn test_oscillate_tick_noop_when_text_fits() {
        let mut matrix = display(&one_device());
        matrix.set_text("A"); // 7 pixels on an 8-pixel display
        matrix.start_animation(ScrollMode::Oscillate);
        for _ in 0..50 {
            matrix.tick();
        }
        assert_eq!(matrix.scroll_offset(), 0);
    }

    #[test]
    fn test_rotation_applied_on_commit() {
        let mut matrix = display(&one_device());
        matrix.set_rotation(true);
        matrix.set_pixel(7, 0);
        matrix.commit();
        // (col 7, row 0) rotates to (col 0, row 0)
        assert_eq!(matrix.transport.writes[0], (0, 1, 0b0000_0001));
        assert!(matrix.transport.writes[1..].iter().all(|w| w.2 == 0));
    }

    #[test]
    fn test_text_truncated_at_capacity() {
        let mut matrix = display(&one_device());
        let long = [b'A'; 100];
        matrix.set_text(core::str::from_utf8(&long).unwrap());
        assert_eq!(matrix.text().chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_char_width_change_recomputes_alignment() {
        let mut matrix = display(&one_device());
        matrix.set_alignment(Alignment::RightEnd);
        matrix.set_text("AB");
        assert_eq!(matrix.alignment_offset(), -14);

        matrix.set_char_width(8);
        assert_eq!(matrix.alignment_offset(), -16);

        // zero width is ignored
        matrix.set_char_width(0);
        assert_eq!(matrix.alignment_offset(), -16);
    }
}
