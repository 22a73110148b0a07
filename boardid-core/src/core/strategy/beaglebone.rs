//! Serial number from the BeagleBone board EEPROM.
//!
//! The EEPROM starts with a 4-byte magic, an 8-byte board name and a 4-byte
//! version, followed by a 12-character ASCII serial number.

use super::{ProbeError, ProbeResult};
use crate::core::env_source::read_window;
use crate::{RawId, SystemRoot};

const EEPROM_PATHS: [&str; 2] = [
    "/sys/bus/i2c/devices/0-0050/eeprom",
    "/sys/bus/nvmem/devices/0-00500/nvmem",
];

const EEPROM_MAGIC: [u8; 4] = [0xaa, 0x55, 0x33, 0xee];
const SERIAL_OFFSET: usize = 16;
const SERIAL_LEN: usize = 12;

pub(super) fn probe(root: &SystemRoot) -> ProbeResult {
    let header = read_header(root)?;
    parse_serial(&header).map(RawId::Text)
}

fn read_header(root: &SystemRoot) -> Result<Vec<u8>, ProbeError> {
    let mut last_error = None;
    for path in EEPROM_PATHS {
        match read_window(&root.resolve(path), 0, SERIAL_OFFSET + SERIAL_LEN) {
            Ok(header) => return Ok(header),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error
        .map(ProbeError::from)
        .unwrap_or_else(|| ProbeError::Unavailable("No BeagleBone EEPROM".to_string())))
}

fn parse_serial(header: &[u8]) -> Result<String, ProbeError> {
    if !header.starts_with(&EEPROM_MAGIC) {
        return Err(ProbeError::Unavailable(
            "BeagleBone EEPROM has an invalid header".to_string(),
        ));
    }

    let serial = header
        .get(SERIAL_OFFSET..SERIAL_OFFSET + SERIAL_LEN)
        .filter(|serial| serial.iter().all(u8::is_ascii_alphanumeric))
        .ok_or_else(|| {
            ProbeError::Unavailable("BeagleBone EEPROM serial number is not programmed".to_string())
        })?;

    Ok(String::from_utf8_lossy(serial).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env_source::LoadError;
    use std::fs;

    fn eeprom(serial: &[u8; 12]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&EEPROM_MAGIC);
        data.extend_from_slice(b"A335BNLT");
        data.extend_from_slice(b"00C0");
        data.extend_from_slice(serial);
        data.extend_from_slice(&[0xff; 32]);
        data
    }

    #[test]
    fn test_parse_serial() {
        assert_eq!(parse_serial(&eeprom(b"1813BBBK0123")).unwrap(), "1813BBBK0123");
    }

    #[test]
    fn test_bad_magic() {
        let mut data = eeprom(b"1813BBBK0123");
        data[0] = 0;
        assert!(parse_serial(&data).is_err());
    }

    #[test]
    fn test_unprogrammed_serial() {
        let mut data = eeprom(b"1813BBBK0123");
        data[SERIAL_OFFSET..SERIAL_OFFSET + SERIAL_LEN].fill(0xff);
        assert!(parse_serial(&data).is_err());
    }

    #[test]
    fn test_probe_falls_back_to_nvmem_path() {
        let dir = tempfile::tempdir().unwrap();
        let nvmem = dir.path().join("sys/bus/nvmem/devices/0-00500");
        fs::create_dir_all(&nvmem).unwrap();
        fs::write(nvmem.join("nvmem"), eeprom(b"4915BBBK5678")).unwrap();

        let id = probe(&SystemRoot::new(dir.path())).unwrap();
        assert_eq!(id, RawId::Text("4915BBBK5678".to_string()));
    }

    #[test]
    fn test_probe_without_eeprom() {
        let dir = tempfile::tempdir().unwrap();
        let err = probe(&SystemRoot::new(dir.path())).unwrap_err();
        assert!(matches!(err, ProbeError::Load(LoadError::Open { .. })));
    }
}
