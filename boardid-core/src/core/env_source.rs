//! Loads a U-Boot environment window from a file or block device.

use crate::core::uboot_env::{EnvError, UbootEnv};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Errors raised while fetching an environment blob.
///
/// `Open`, `Seek` and `Read` mean the source is not there (or too small);
/// `Env` means it was read but the content is unusable.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Seek to offset {offset} failed on {}: {source}", path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },

    #[error("Read of {size} bytes failed on {}: {source}", path.display())]
    Read {
        path: PathBuf,
        size: usize,
        source: io::Error,
    },

    #[error(transparent)]
    Env(#[from] EnvError),
}

impl LoadError {
    /// Returns `true` when the blob was read but failed validation.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Env(e) if e.is_corrupt())
    }
}

/// Reads exactly `size` bytes at `offset` from `path`.
///
/// # Errors
///
/// Returns the [`LoadError`] variant for whichever of open, seek, or read
/// failed. A file shorter than `offset + size` is a [`LoadError::Read`].
///
/// The buffer grows with the bytes actually read, so a `size` far larger
/// than the file fails the read instead of the allocation.
pub fn read_window(path: &Path, offset: u64, size: usize) -> Result<Vec<u8>, LoadError> {
    let mut file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    file.seek(SeekFrom::Start(offset))
        .map_err(|source| LoadError::Seek {
            path: path.to_path_buf(),
            offset,
            source,
        })?;

    let read_error = |source| LoadError::Read {
        path: path.to_path_buf(),
        size,
        source,
    };

    let mut blob = Vec::new();
    file.take(u64::try_from(size).unwrap_or(u64::MAX))
        .read_to_end(&mut blob)
        .map_err(read_error)?;
    if blob.len() != size {
        return Err(read_error(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("only {} bytes available", blob.len()),
        )));
    }

    Ok(blob)
}

/// Reads the environment at `offset`/`size` in `path` and copies the value of
/// `key` into `out` with [`UbootEnv::get_into`] semantics.
///
/// Returns `Ok(None)` when the environment is valid but lacks `key`.
///
/// # Errors
///
/// I/O failures as described on [`read_window`]; parser failures pass through
/// as [`LoadError::Env`].
pub fn load_and_lookup(
    path: &Path,
    offset: u64,
    size: usize,
    key: &str,
    out: &mut [u8],
) -> Result<Option<usize>, LoadError> {
    let blob = read_window(path, offset, size)?;
    let env = UbootEnv::parse(&blob)?;
    Ok(env.get_into(key, out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uboot_env::tests::{make_blob, reseal};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_file(prefix: &[u8], blob: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(prefix).unwrap();
        temp.write_all(blob).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_load_and_lookup_at_offset() {
        let blob = make_blob(b"serial=ABC123\0\0", 64);
        let temp = env_file(&[0xaa; 512], &blob);

        let mut out = [0u8; 33];
        let len = load_and_lookup(temp.path(), 512, 64, "serial", &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(&out[..len], b"ABC123");
    }

    #[test]
    fn test_missing_key_is_none() {
        let blob = make_blob(b"board=rpi\0\0", 64);
        let temp = env_file(&[], &blob);

        let mut out = [0u8; 33];
        assert!(load_and_lookup(temp.path(), 0, 64, "serial", &mut out)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = [0u8; 33];
        let err = load_and_lookup(&dir.path().join("nope"), 0, 64, "serial", &mut out)
            .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_short_file_is_read_failure() {
        let blob = make_blob(b"serial=ABC123\0\0", 64);
        let temp = env_file(&[], &blob);

        let mut out = [0u8; 33];
        let err = load_and_lookup(temp.path(), 0, 128, "serial", &mut out).unwrap_err();
        assert!(matches!(err, LoadError::Read { size: 128, .. }));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_oversized_window_is_read_failure() {
        let blob = make_blob(b"serial=ABC123\0\0", 64);
        let temp = env_file(&[], &blob);

        for size in [1 << 40, usize::MAX] {
            let err = read_window(temp.path(), 0, size).unwrap_err();
            match err {
                LoadError::Read { size: s, source, .. } => {
                    assert_eq!(s, size);
                    assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_wrong_offset_is_checksum_mismatch() {
        let blob = make_blob(b"serial=ABC123\0\0", 64);
        let temp = env_file(&[0u8; 16], &blob);

        let mut out = [0u8; 33];
        let err = load_and_lookup(temp.path(), 0, 64, "serial", &mut out).unwrap_err();
        assert!(matches!(err, LoadError::Env(EnvError::ChecksumMismatch { .. })));
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_malformed_passes_through() {
        let mut blob = vec![0u8; 32];
        blob[4..15].copy_from_slice(b"badrecord\0\0");
        reseal(&mut blob);
        let temp = env_file(&[], &blob);

        let mut out = [0u8; 33];
        let err = load_and_lookup(temp.path(), 0, 32, "serial", &mut out).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Env(EnvError::MalformedRecord { offset: 4 })
        ));
    }

    #[test]
    fn test_long_value_is_truncated_to_buffer() {
        let blob = make_blob(b"serial=0123456789abcdef0123456789abcdefXYZ\0\0", 128);
        let temp = env_file(&[], &blob);

        let mut out = [0u8; 33];
        let len = load_and_lookup(temp.path(), 0, 128, "serial", &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(len, 32);
        assert_eq!(&out[..32], b"0123456789abcdef0123456789abcdef");
        assert_eq!(out[32], 0);
    }
}
