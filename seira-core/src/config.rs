//! Configuration type definitions
//!
//! The display configuration is consumed once at initialization. Device
//! count is immutable afterwards; intensity, character width, alignment
//! and rotation remain runtime-settable through the display facade.

use crate::layout::Alignment;

/// Columns contributed by one cascaded device
pub const COLUMNS_PER_DEVICE: usize = 8;

/// Maximum cascaded devices per chain
pub const MAX_DEVICES: usize = 32;

/// Maximum frame buffer columns (capacity bound, not the runtime size)
pub const MAX_COLUMNS: usize = MAX_DEVICES * COLUMNS_PER_DEVICE;

/// Maximum display/queued text length in characters
pub const MAX_TEXT_LEN: usize = 64;

/// Highest intensity level the MAX7219 accepts
pub const MAX_INTENSITY: u8 = 15;

/// Errors that make a configuration unusable
///
/// These are fatal to initialization: the display refuses to allocate
/// buffers or issue device writes for an invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device count is zero
    NoDevices,
    /// Device count exceeds [`MAX_DEVICES`]
    TooManyDevices,
    /// Character width is zero (would degenerate the scroll moduli)
    ZeroCharWidth,
    /// Intensity above [`MAX_INTENSITY`]
    IntensityOutOfRange,
}

/// Display configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Number of cascaded devices (1..=[`MAX_DEVICES`])
    pub device_count: u8,
    /// Initial intensity, forwarded verbatim to the devices (0-15)
    pub intensity: u8,
    /// Width in pixels reserved per character
    pub char_width: u8,
    /// Text alignment policy
    pub alignment: Alignment,
    /// Rotate each 8x8 tile 90 degrees before transmission
    pub rotation: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            device_count: 4,
            intensity: 0, // dimmest visible level
            char_width: 7,
            alignment: Alignment::LeftEnd,
            rotation: false,
        }
    }
}

impl DisplayConfig {
    /// Validate the configuration
    ///
    /// Called by the display constructor before any buffer is allocated
    /// or any device write is issued.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_count == 0 {
            return Err(ConfigError::NoDevices);
        }
        if self.device_count as usize > MAX_DEVICES {
            return Err(ConfigError::TooManyDevices);
        }
        if self.char_width == 0 {
            return Err(ConfigError::ZeroCharWidth);
        }
        if self.intensity > MAX_INTENSITY {
            return Err(ConfigError::IntensityOutOfRange);
        }
        Ok(())
    }
}
