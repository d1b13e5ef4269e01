//! Hardware abstraction traits
//!
//! The core never talks to hardware directly. The transport adapter owns
//! the bus; the glyph source owns the font data. Both are injected into
//! the display facade.

/// Trait for the physical transport behind the display
///
/// Implementations serialize a single logical register write to the full
/// device chain before returning. Write failures are the adapter's concern:
/// it reports (logs) them and the core proceeds as if the write succeeded,
/// since retrying mid-frame would desynchronize the scroll timing.
pub trait Transport {
    /// Write one register on one device in the chain
    ///
    /// - `device`: chain index, 0 is the device closest to the controller
    /// - `register`: raw register address (the core addresses column data
    ///   as `col % 8 + 1`)
    /// - `value`: register payload
    fn write_register(&mut self, device: u8, register: u8, value: u8);

    /// Forward an intensity level (0-15) verbatim to every device
    fn set_intensity(&mut self, level: u8);
}

/// Trait for character-to-bitmap lookup
///
/// A glyph is 8 column bytes, bit 0 = top row. Coverage of the input
/// character set is the glyph source's concern; sources substitute a
/// blank for unmapped code points rather than failing.
pub trait GlyphSource {
    /// Look up the 8-column bitmap for a character
    fn glyph(&self, ch: char) -> [u8; 8];
}
