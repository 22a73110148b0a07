//! Minimal Linux i2c-dev transport.

use std::fs::File;
use std::io;
use std::path::Path;

/// Byte-level access to devices on an I2C bus.
pub(crate) trait I2cBus {
    /// Directs subsequent reads and writes at the 7-bit `address`.
    fn set_address(&mut self, address: u16) -> io::Result<()>;

    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// An opened `/dev/i2c-N` character device.
pub(crate) struct I2cDevice {
    file: File,
}

impl I2cDevice {
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = File::options().read(true).write(true).open(path)?;
        Ok(Self { file })
    }
}

#[cfg(target_os = "linux")]
impl I2cBus for I2cDevice {
    fn set_address(&mut self, address: u16) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        const I2C_SLAVE: u16 = 0x0703;

        // SAFETY: I2C_SLAVE takes the address by value and the descriptor is
        // owned by `self.file` for the duration of the call.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                I2C_SLAVE as _,
                libc::c_ulong::from(address),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.file, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        io::Read::read_exact(&mut self.file, buf)
    }
}

#[cfg(not(target_os = "linux"))]
impl I2cBus for I2cDevice {
    fn set_address(&mut self, _address: u16) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "i2c-dev is only available on Linux",
        ))
    }

    fn write(&mut self, _data: &[u8]) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn read(&mut self, _buf: &mut [u8]) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }
}
