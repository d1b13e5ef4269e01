//! Scroll and oscillation state machine
//!
//! Owns the live scroll offset and oscillation direction. All transitions
//! are driven by external ticks; the state machine itself holds no timer.
//!
//! The left and right scroll moduli differ on purpose: right-scroll uses
//! `(len + devices + 1) * char_width`, producing a longer blank gap
//! before the text re-enters from the left.

/// Animation modes driven by [`tick`](crate::display::MatrixDisplay::tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollMode {
    /// Offset fixed, ticks do nothing
    #[default]
    Idle,
    /// Text moves left one pixel per tick, wrapping after a full cycle
    Left,
    /// Text moves right one pixel per tick (wider wrap than left-scroll)
    Right,
    /// Text bounces between the display edges
    Oscillate,
}

/// Sign-preserving modulo
///
/// The result carries the sign of `value` with magnitude `|value| % modulus`.
/// This is not the Euclidean (always-positive) modulo: negative offsets stay
/// negative so leftward scroll positions keep their direction. A zero
/// modulus is degenerate and yields 0 rather than dividing; validated
/// configurations never produce one.
pub fn wrap(value: i32, modulus: i32) -> i32 {
    if modulus == 0 {
        return 0;
    }
    let magnitude = value.abs() % modulus;
    if value < 0 { -magnitude } else { magnitude }
}

/// Live scroll offset plus oscillation direction
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scroller {
    offset: i32,
    increment: i32,
}

impl Scroller {
    /// Create a scroller at offset zero, oscillating leftward first
    pub fn new() -> Self {
        Self {
            offset: 0,
            increment: -1,
        }
    }

    /// Current scroll offset in pixels
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Reset the offset to zero (text assignment does this); the
    /// oscillation direction is kept
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Advance one pixel leftward
    ///
    /// Wraps at `text_width + display_width`. Returns `true` when the
    /// wrapped offset lands exactly on zero - a completed scroll cycle,
    /// which is the hand-off point for queued text.
    pub fn step_left(&mut self, text_width: i32, display_width: i32) -> bool {
        self.offset = wrap(self.offset - 1, text_width + display_width);
        self.offset == 0
    }

    /// Advance one pixel rightward
    ///
    /// Wraps at `(text_len + device_count + 1) * char_width` - deliberately
    /// wider than the left-scroll modulus (see module docs).
    pub fn step_right(&mut self, text_len: usize, device_count: usize, char_width: u8) {
        let modulus = (text_len as i32 + device_count as i32 + 1) * char_width as i32;
        self.offset = wrap(self.offset + 1, modulus);
    }

    /// Advance one oscillation step
    ///
    /// A no-op when the text fits on screen (`text_width <= display_width`):
    /// there is nothing to bounce. Otherwise the offset moves by the current
    /// increment, flipping direction at either limit.
    pub fn oscillate(&mut self, text_width: i32, display_width: i32) {
        if text_width <= display_width {
            return;
        }
        if self.offset - display_width == -text_width {
            self.increment = 1;
        }
        if self.offset == 0 {
            self.increment = -1;
        }
        self.offset += self.increment;
    }
}
