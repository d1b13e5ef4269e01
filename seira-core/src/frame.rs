//! Frame buffer for cascaded 8x8 LED matrices
//!
//! One byte per physical LED column (bit 0 = top row), 8 columns per
//! device, laid out left-to-right in native chip order. The buffer is the
//! single source of truth for what gets transmitted: glyph drawing and the
//! rotation transform mutate it, the commit step reads it.
//!
//! Out-of-range writes are silently dropped. The scroll math routinely
//! produces transient off-screen columns, so bounds clamping is a
//! return-without-effect, not an error.

use heapless::Vec;

use crate::config::{COLUMNS_PER_DEVICE, MAX_COLUMNS, MAX_DEVICES};

/// Column frame buffer sized to the configured device chain
///
/// Allocated once at initialization; the length (`8 * device_count`) never
/// changes afterwards. A same-sized scratch buffer backs the rotation
/// transform.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    columns: Vec<u8, MAX_COLUMNS>,
    scratch: Vec<u8, MAX_COLUMNS>,
}

impl FrameBuffer {
    /// Create a zeroed buffer for `device_count` cascaded devices
    pub fn new(device_count: u8) -> Self {
        // Cannot overflow capacity: device_count is clamped to MAX_DEVICES
        // (the display facade validates the configuration before this).
        let len = (device_count as usize).min(MAX_DEVICES) * COLUMNS_PER_DEVICE;
        let mut columns = Vec::new();
        let _ = columns.resize_default(len);
        let mut scratch = Vec::new();
        let _ = scratch.resize_default(len);
        Self { columns, scratch }
    }

    /// Number of columns (`8 * device_count`)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the buffer holds no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of cascaded devices backing this buffer
    pub fn device_count(&self) -> usize {
        self.columns.len() / COLUMNS_PER_DEVICE
    }

    /// Read access to the column bytes
    pub fn columns(&self) -> &[u8] {
        &self.columns
    }

    /// Set every column to zero
    pub fn clear(&mut self) {
        self.columns.fill(0);
    }

    /// Write a full byte to a column
    ///
    /// Negative or past-the-end columns are dropped without effect.
    pub fn set_column(&mut self, column: i32, value: u8) {
        if column < 0 || column as usize >= self.columns.len() {
            return;
        }
        self.columns[column as usize] = value;
    }

    /// Turn on a single pixel (`row` 0..=7, 0 = top)
    ///
    /// There is no single-pixel clear; redraws start from [`clear`](Self::clear).
    pub fn set_pixel(&mut self, column: i32, row: u8) {
        if column < 0 || column as usize >= self.columns.len() || row > 7 {
            return;
        }
        self.columns[column as usize] |= 1 << row;
    }

    /// Rotate each 8x8 tile 90 degrees in place
    ///
    /// Output bit `(tile_base + row, col)` = input bit
    /// `(tile_base + 7 - col, row)`: a per-tile transpose with one axis
    /// reversed. Runs through the scratch buffer, then copies back.
    pub fn rotate(&mut self) {
        for device in 0..self.device_count() {
            let base = device * COLUMNS_PER_DEVICE;
            for row in 0..8 {
                let mut out = 0u8;
                for col in 0..8 {
                    let bit = (self.columns[base + 7 - col] >> row) & 1;
                    out |= bit << col;
                }
                self.scratch[base + row] = out;
            }
        }
        self.columns.copy_from_slice(&self.scratch);
    }
}
