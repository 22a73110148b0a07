//! A variable from a U-Boot environment stored in a file or block device.

use super::{missing, ProbeError, ProbeResult};
use crate::core::env_source::load_and_lookup;
use crate::{IdentitySource, RawId, SystemRoot, MAX_SERIAL_NUMBER_LEN};

/// Values must be UTF-8. A multi-byte character cut off by the 32-byte cap is
/// dropped; any other invalid byte makes the source unavailable.
pub(super) fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    let filename = source.filename.as_deref().ok_or_else(|| missing(source, "filename"))?;
    let offset = source.offset.ok_or_else(|| missing(source, "offset"))?;
    let size = source.size.ok_or_else(|| missing(source, "size"))?;
    let name = source
        .variable_name
        .as_deref()
        .ok_or_else(|| missing(source, "variable name"))?;

    let mut value = [0u8; MAX_SERIAL_NUMBER_LEN + 1];
    let len = load_and_lookup(&root.resolve(filename), offset, size, name, &mut value)?
        .ok_or_else(|| ProbeError::NotFound(name.to_string()))?;

    let text = match std::str::from_utf8(&value[..len]) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&value[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(e) => {
            return Err(ProbeError::Unavailable(format!(
                "{}: {name} is not valid UTF-8 ({e})",
                source.name
            )));
        }
    };
    Ok(RawId::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uboot_env::tests::make_blob;
    use std::fs;

    fn fake_env(records: &[u8]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut image = vec![0xffu8; 0x100];
        image.extend_from_slice(&make_blob(records, 0x200));
        fs::write(dir.path().join("uboot.env"), image).unwrap();
        dir
    }

    #[test]
    fn test_reads_variable() {
        let dir = fake_env(b"bootcmd=run x\0serial_number=ABC123\0\0");
        let source = IdentitySource::uboot_env("/uboot.env", 0x100, 0x200, "serial_number");

        let id = probe(&source, &SystemRoot::new(dir.path())).unwrap();
        assert_eq!(id, RawId::Text("ABC123".to_string()));
    }

    #[test]
    fn test_missing_variable_is_not_found() {
        let dir = fake_env(b"bootcmd=run x\0\0");
        let source = IdentitySource::uboot_env("/uboot.env", 0x100, 0x200, "serial_number");

        let err = probe(&source, &SystemRoot::new(dir.path())).unwrap_err();
        assert!(matches!(err, ProbeError::NotFound(ref name) if name == "serial_number"));
    }

    #[test]
    fn test_wrong_offset_is_corrupt() {
        let dir = fake_env(b"serial_number=ABC123\0\0");
        let source = IdentitySource::uboot_env("/uboot.env", 0, 0x200, "serial_number");

        let err = probe(&source, &SystemRoot::new(dir.path())).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_non_utf8_value_is_unavailable() {
        let dir = fake_env(b"serial_number=AB\xff\xfeCD\0\0");
        let source = IdentitySource::uboot_env("/uboot.env", 0x100, 0x200, "serial_number");

        let err = probe(&source, &SystemRoot::new(dir.path())).unwrap_err();
        assert!(matches!(err, ProbeError::Unavailable(_)));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_character_split_by_cap_is_dropped() {
        let mut records = b"serial_number=".to_vec();
        records.extend_from_slice(&[b'x'; 31]);
        records.extend_from_slice("é\0\0".as_bytes());
        let dir = fake_env(&records);
        let source = IdentitySource::uboot_env("/uboot.env", 0x100, 0x200, "serial_number");

        let id = probe(&source, &SystemRoot::new(dir.path())).unwrap();
        assert_eq!(id.render(), "x".repeat(31));
    }

    #[test]
    fn test_value_is_capped_at_serial_length() {
        let dir = fake_env(b"serial_number=0123456789012345678901234567890123456789\0\0");
        let source = IdentitySource::uboot_env("/uboot.env", 0x100, 0x200, "serial_number");

        let id = probe(&source, &SystemRoot::new(dir.path())).unwrap();
        assert_eq!(id.render(), "01234567890123456789012345678901");
    }
}
