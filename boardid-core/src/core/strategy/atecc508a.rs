//! Serial number of a Microchip ATECC508A/608A authentication chip.
//!
//! The chip sleeps until SDA is held low, answers a 7-byte command packet
//! with `count ‖ data ‖ crc16`, and stores its 9-byte serial number in bytes
//! 0..4 and 8..13 of configuration zone block 0.

use super::i2c::{I2cBus, I2cDevice};
use super::{ProbeError, ProbeResult};
use crate::{IdentitySource, RawId, SystemRoot};
use std::io;
use std::thread;
use std::time::Duration;

pub(super) const DEFAULT_BUS: &str = "/dev/i2c-1";
pub(super) const DEFAULT_ADDRESS: u16 = 0x60;

pub(super) const ZONE_CONFIG: u8 = 0x00;
pub(super) const ZONE_OTP: u8 = 0x01;
pub(super) const BLOCK_LEN: usize = 32;

const WAKE_RESPONSE: [u8; 4] = [0x04, 0x11, 0x33, 0x43];
const WORD_ADDRESS_COMMAND: u8 = 0x03;
const WORD_ADDRESS_SLEEP: u8 = 0x01;
const OPCODE_READ: u8 = 0x02;
const READ_32_BYTES: u8 = 0x80;
const READ_RESPONSE_LEN: usize = 1 + BLOCK_LEN + 2;

const WAKE_DELAY: Duration = Duration::from_micros(1500);
const READ_EXECUTION_TIME: Duration = Duration::from_millis(5);

pub(super) fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    let mut chip = Atecc508a::open(source, root)?;
    let config = chip.with_awake(|chip| chip.read_block(ZONE_CONFIG, 0))?;
    Ok(RawId::Binary(serial_from_config(&config).to_vec()))
}

/// Extracts the 9-byte serial number from configuration block 0.
pub(super) fn serial_from_config(config: &[u8; BLOCK_LEN]) -> [u8; 9] {
    let mut serial = [0u8; 9];
    serial[..4].copy_from_slice(&config[0..4]);
    serial[4..].copy_from_slice(&config[8..13]);
    serial
}

pub(super) struct Atecc508a<B> {
    bus: B,
    address: u16,
}

impl Atecc508a<I2cDevice> {
    /// Opens the bus named by `source.filename` and targets `source.offset`,
    /// falling back to `/dev/i2c-1` and `0x60`.
    pub(super) fn open(source: &IdentitySource, root: &SystemRoot) -> Result<Self, ProbeError> {
        let bus_path = root.resolve(source.filename.as_deref().unwrap_or(DEFAULT_BUS));
        let address = source
            .offset
            .and_then(|a| u16::try_from(a).ok())
            .unwrap_or(DEFAULT_ADDRESS);

        let bus = I2cDevice::open(&bus_path).map_err(|e| {
            ProbeError::Unavailable(format!("Cannot open {}: {e}", bus_path.display()))
        })?;
        Ok(Self::new(bus, address))
    }
}

impl<B: I2cBus> Atecc508a<B> {
    pub(super) fn new(bus: B, address: u16) -> Self {
        Self { bus, address }
    }

    /// Wakes the chip, runs `f`, and puts the chip back to sleep whether or
    /// not `f` succeeded.
    pub(super) fn with_awake<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> io::Result<T>,
    ) -> io::Result<T> {
        self.wake()?;
        let result = f(self);
        let slept = self.sleep();
        let value = result?;
        slept?;
        Ok(value)
    }

    fn wake(&mut self) -> io::Result<()> {
        // Writing to the general call address holds SDA low long enough to
        // wake the chip. Nothing acknowledges it.
        self.bus.set_address(0)?;
        let _ = self.bus.write(&[0]);
        self.bus.set_address(self.address)?;
        thread::sleep(WAKE_DELAY);

        let mut response = [0u8; 4];
        self.bus.read(&mut response)?;
        if response != WAKE_RESPONSE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected wake response {response:02x?}"),
            ));
        }
        Ok(())
    }

    fn sleep(&mut self) -> io::Result<()> {
        self.bus.write(&[WORD_ADDRESS_SLEEP])
    }

    /// Reads 32-byte `block` of `zone`.
    pub(super) fn read_block(&mut self, zone: u8, block: u8) -> io::Result<[u8; BLOCK_LEN]> {
        let [addr_lo, addr_hi] = (u16::from(block) << 3).to_le_bytes();
        let mut packet = [
            WORD_ADDRESS_COMMAND,
            7,
            OPCODE_READ,
            zone | READ_32_BYTES,
            addr_lo,
            addr_hi,
            0,
            0,
        ];
        let crc = crc16(&packet[1..6]);
        packet[6..].copy_from_slice(&crc.to_le_bytes());
        self.bus.write(&packet)?;

        thread::sleep(READ_EXECUTION_TIME);

        let mut response = [0u8; READ_RESPONSE_LEN];
        self.bus.read(&mut response)?;
        if usize::from(response[0]) != READ_RESPONSE_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("read of zone {zone} failed with status 0x{:02x}", response[1]),
            ));
        }
        let expected = u16::from_le_bytes([response[33], response[34]]);
        if crc16(&response[..33]) != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "CRC mismatch in read response",
            ));
        }

        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&response[1..33]);
        Ok(block)
    }
}

/// CRC-16 used on the ATECC wire protocol (polynomial 0x8005, data bits fed
/// least significant first, no reflection of the result).
pub(super) fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        for bit in 0..8 {
            let data_bit = (byte >> bit) & 1;
            let crc_bit = (crc >> 15) as u8;
            crc <<= 1;
            if data_bit != crc_bit {
                crc ^= 0x8005;
            }
        }
    }
    crc
}
