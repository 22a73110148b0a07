//! Raw bytes at a fixed offset of a file, EEPROM, or block device.

use super::{missing, ProbeResult};
use crate::core::env_source::read_window;
use crate::{IdentitySource, RawId, SystemRoot};

pub(super) fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    let filename = source.filename.as_deref().ok_or_else(|| missing(source, "filename"))?;
    let size = source.size.ok_or_else(|| missing(source, "size"))?;
    let offset = source.offset.unwrap_or(0);

    let bytes = read_window(&root.resolve(filename), offset, size)?;
    Ok(RawId::Binary(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env_source::LoadError;
    use crate::core::strategy::ProbeError;
    use std::fs;

    #[test]
    fn test_reads_window_as_hex() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("eeprom"), [0u8, 1, 2, 3, 0xde, 0xad, 0xbe, 0xef, 9]).unwrap();

        let source = IdentitySource::binfile("/eeprom", 4, 4);
        let id = probe(&source, &SystemRoot::new(dir.path())).unwrap();
        assert_eq!(id.render(), "deadbeef");
    }

    #[test]
    fn test_window_past_end_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("eeprom"), [1u8, 2, 3]).unwrap();

        let source = IdentitySource::binfile("/eeprom", 0, 8);
        let err = probe(&source, &SystemRoot::new(dir.path())).unwrap_err();
        assert!(matches!(err, ProbeError::Load(LoadError::Read { .. })));
    }
}
