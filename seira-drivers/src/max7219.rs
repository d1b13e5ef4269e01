//! MAX7219 cascaded LED driver chain
//!
//! Driver for chains of MAX7219 8x8 LED matrix controllers sharing one
//! SPI bus and one chip-select line. Each chip holds eight digit
//! registers; cascading works by shifting 16-bit frames through the
//! chain while CS is low and latching them all on the rising edge.
//!
//! Device index 0 is the chip closest to the controller. Its frame must
//! therefore be the last one clocked out; chips in between receive
//! no-op frames.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use heapless::Vec;

use seira_core::config::MAX_DEVICES;
use seira_core::traits::Transport;

/// MAX7219 register addresses
pub mod reg {
    pub const NOOP: u8 = 0x00;
    /// Digit registers are `DIGIT0 + n` for n in 0..8
    pub const DIGIT0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Bus-level driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// Chip-select pin failed
    Pin(P),
}

/// Driver for a chain of cascaded MAX7219 devices
pub struct Max7219<SPI, CS> {
    spi: SPI,
    cs: CS,
    device_count: u8,
}

impl<SPI, CS> Max7219<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Create a driver for `device_count` chips (clamped to [`MAX_DEVICES`])
    ///
    /// No bus traffic happens here; call [`init`](Self::init) before use.
    pub fn new(spi: SPI, cs: CS, device_count: u8) -> Self {
        Self {
            spi,
            cs,
            device_count: device_count.min(MAX_DEVICES as u8),
        }
    }

    /// Number of chips in the chain
    pub fn device_count(&self) -> u8 {
        self.device_count
    }

    /// Put every chip into a known display state
    ///
    /// Full scan, no BCD decoding, display test off, minimum intensity,
    /// all digits dark. The shutdown register is released last so no
    /// power-on garbage ever reaches the LEDs.
    pub fn init(&mut self) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.broadcast(reg::SCAN_LIMIT, 7)?;
        self.broadcast(reg::DECODE_MODE, 0)?;
        self.broadcast(reg::DISPLAY_TEST, 0)?;
        self.broadcast(reg::INTENSITY, 0)?;
        for digit in 0..8 {
            self.broadcast(reg::DIGIT0 + digit, 0)?;
        }
        self.broadcast(reg::SHUTDOWN, 1)
    }

    /// Set the brightness (0-15) of every chip
    pub fn set_intensity(&mut self, level: u8) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.broadcast(reg::INTENSITY, level & 0x0F)
    }

    /// Wake (`true`) or shut down (`false`) every chip
    pub fn set_power(&mut self, on: bool) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.broadcast(reg::SHUTDOWN, on as u8)
    }

    /// Write a register on one chip, padding the rest with no-ops
    pub fn write_device_register(
        &mut self,
        device: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.shift_frames(|chip| {
            if chip == device {
                (register, value)
            } else {
                (reg::NOOP, 0)
            }
        })
    }

    /// Write the same register on every chip in one latch
    pub fn broadcast(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.shift_frames(|_| (register, value))
    }

    /// Clock one 16-bit frame per chip through the chain and latch
    ///
    /// `frame_for` is called with the chip index; the frame for the
    /// furthest chip goes out first. CS is raised even when the transfer
    /// fails, so a bus error never leaves the chain half-latched.
    fn shift_frames(
        &mut self,
        frame_for: impl Fn(u8) -> (u8, u8),
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        let mut buffer: Vec<u8, { 2 * MAX_DEVICES }> = Vec::new();
        for chip in (0..self.device_count).rev() {
            let (register, value) = frame_for(chip);
            let _ = buffer.push(register);
            let _ = buffer.push(value);
        }

        self.cs.set_low().map_err(Error::Pin)?;
        let transfer = self.spi.write(&buffer).map_err(Error::Spi);
        let latch = self.cs.set_high().map_err(Error::Pin);
        transfer?;
        latch
    }
}

impl<SPI, CS> Transport for Max7219<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Forward a column write, dropping bus errors
    ///
    /// The display core treats commits as fire-and-forget; a failed
    /// write costs one stale column until the next frame.
    fn write_register(&mut self, device: u8, register: u8, value: u8) {
        if self.write_device_register(device, register, value).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("max7219: dropped write to device {}", device);
        }
    }

    fn set_intensity(&mut self, level: u8) {
        if self.broadcast(reg::INTENSITY, level & 0x0F).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("max7219: dropped intensity update");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::ErrorKind;

    /// SPI bus mock recording everything written
    #[derive(Default)]
    struct MockSpi {
        written: Vec<u8, 1024>,
        fail: bool,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = ErrorKind;
    }

    impl SpiBus<u8> for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.written.extend_from_slice(words).unwrap();
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Chip-select mock recording every edge (`true` = high)
    #[derive(Default)]
    struct MockCs {
        edges: Vec<bool, 256>,
    }

    impl embedded_hal::digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.edges.push(false).unwrap();
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.edges.push(true).unwrap();
            Ok(())
        }
    }

    fn driver(device_count: u8) -> Max7219<MockSpi, MockCs> {
        Max7219::new(MockSpi::default(), MockCs::default(), device_count)
    }

    #[test]
    fn test_targeted_write_pads_with_noops() {
        let mut max = driver(4);
        max.write_device_register(1, reg::DIGIT0, 0xAA).unwrap();

        // chips are clocked furthest-first: 3, 2, 1, 0
        assert_eq!(
            &max.spi.written[..],
            &[
                reg::NOOP,
                0,
                reg::NOOP,
                0,
                reg::DIGIT0,
                0xAA,
                reg::NOOP,
                0
            ]
        );
    }

    #[test]
    fn test_cs_brackets_every_latch() {
        let mut max = driver(2);
        max.write_device_register(0, reg::DIGIT0, 1).unwrap();
        max.broadcast(reg::INTENSITY, 3).unwrap();
        assert_eq!(&max.cs.edges[..], &[false, true, false, true]);
    }

    #[test]
    fn test_broadcast_reaches_every_chip() {
        let mut max = driver(3);
        max.broadcast(reg::SHUTDOWN, 1).unwrap();
        assert_eq!(
            &max.spi.written[..],
            &[reg::SHUTDOWN, 1, reg::SHUTDOWN, 1, reg::SHUTDOWN, 1]
        );
    }

    #[test]
    fn test_init_wakes_chips_last() {
        let mut max = driver(1);
        max.init().unwrap();

        let registers: Vec<u8, 16> = max.spi.written.iter().step_by(2).copied().collect();
        assert_eq!(registers[0], reg::SCAN_LIMIT);
        assert_eq!(registers[1], reg::DECODE_MODE);
        assert_eq!(registers[2], reg::DISPLAY_TEST);
        assert_eq!(registers[3], reg::INTENSITY);
        // all eight digits cleared before waking
        for digit in 0..8u8 {
            assert_eq!(registers[4 + digit as usize], reg::DIGIT0 + digit);
        }
        assert_eq!(*registers.last().unwrap(), reg::SHUTDOWN);
        assert_eq!(*max.spi.written.last().unwrap(), 1);
    }

    #[test]
    fn test_init_scan_limit_and_decode_values() {
        let mut max = driver(1);
        max.init().unwrap();
        assert_eq!(&max.spi.written[..4], &[reg::SCAN_LIMIT, 7, reg::DECODE_MODE, 0]);
    }

    #[test]
    fn test_intensity_masked_to_low_nibble() {
        let mut max = driver(1);
        max.set_intensity(0x77).unwrap();
        assert_eq!(&max.spi.written[..], &[reg::INTENSITY, 0x07]);
    }

    #[test]
    fn test_device_count_clamped() {
        let max = driver(200);
        assert_eq!(max.device_count(), MAX_DEVICES as u8);
    }

    #[test]
    fn test_transport_swallows_bus_errors() {
        let mut max = driver(2);
        max.spi.fail = true;

        Transport::write_register(&mut max, 0, reg::DIGIT0, 0xFF);
        Transport::set_intensity(&mut max, 5);

        // CS still released after the failed transfer
        assert_eq!(&max.cs.edges[..], &[false, true, false, true]);
        assert!(max.spi.written.is_empty());
    }

    #[test]
    fn test_power_toggle() {
        let mut max = driver(1);
        max.set_power(false).unwrap();
        max.set_power(true).unwrap();
        assert_eq!(
            &max.spi.written[..],
            &[reg::SHUTDOWN, 0, reg::SHUTDOWN, 1]
        );
    }
}
