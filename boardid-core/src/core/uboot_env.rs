//! Read-only parser for a U-Boot persistent environment blob.
//!
//! ## Layout
//!
//! ```text
//! offset 0..4    : little-endian CRC-32 of bytes [4, size)
//! offset 4..size : "key=value\0" records, ended by an empty record ("\0")
//! ```
//!
//! There is no record count and no length prefix; record boundaries are only
//! discovered by scanning for `=` and NUL. The region after the end marker is
//! padding and is covered by the CRC like everything else.
//!
//! ## Scanning
//!
//! Records are never copied. [`UbootEnv::records`] yields `(key, value)`
//! slices that borrow from the original buffer, and every cursor move is
//! bounded by the slice length, so a corrupt blob produces
//! [`EnvError::MalformedRecord`] rather than an out-of-bounds read.
//!
//! A key that is absent is not an error: lookups return `Ok(None)` so callers
//! can tell "the environment is fine but lacks this key" from "the
//! environment is damaged".
//!
//! ## Examples
//!
//! ```rust
//! use boardid_core::UbootEnv;
//!
//! let mut blob = vec![0u8; 4];
//! blob.extend_from_slice(b"serial=ABC123\0\0");
//! let crc = crc32fast::hash(&blob[4..]);
//! blob[..4].copy_from_slice(&crc.to_le_bytes());
//!
//! let env = UbootEnv::parse(&blob).unwrap();
//! assert_eq!(env.get("serial").unwrap(), Some(&b"ABC123"[..]));
//! assert_eq!(env.get("serialx").unwrap(), None);
//! ```

/// Number of bytes taken by the checksum at the start of the blob.
pub const CRC_LEN: usize = 4;

/// Reasons a blob cannot be searched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// The buffer cannot even hold the checksum.
    #[error("U-Boot environment is only {size} bytes; at least {CRC_LEN} are required")]
    Truncated { size: usize },

    /// The stored checksum does not match the payload.
    #[error("U-Boot environment CRC32 mismatch (expected 0x{expected:08x}; got 0x{actual:08x})")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// A record has no `=` before its terminator, or its value runs off the
    /// end of the buffer. `offset` is relative to the start of the blob.
    #[error("Invalid U-Boot environment: malformed record at offset {offset}")]
    MalformedRecord { offset: usize },
}

impl EnvError {
    /// Returns `true` when the blob was read but its content is invalid.
    ///
    /// Such failures usually mean the configured offset or size is wrong.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. } | Self::MalformedRecord { .. })
    }
}

/// A checksum-verified view over an environment blob.
#[derive(Debug, Clone, Copy)]
pub struct UbootEnv<'a> {
    data: &'a [u8],
}

impl<'a> UbootEnv<'a> {
    /// Verifies the CRC-32 of `blob` and returns a view over its records.
    ///
    /// A blob of exactly [`CRC_LEN`] bytes is an empty environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Truncated`] if `blob` is shorter than the checksum,
    /// or [`EnvError::ChecksumMismatch`] if the stored and computed CRCs differ.
    pub fn parse(blob: &'a [u8]) -> Result<Self, EnvError> {
        if blob.len() < CRC_LEN {
            return Err(EnvError::Truncated { size: blob.len() });
        }

        let (crc, data) = blob.split_at(CRC_LEN);
        let expected = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
        let actual = crc32fast::hash(data);
        if expected != actual {
            return Err(EnvError::ChecksumMismatch { expected, actual });
        }

        Ok(Self { data })
    }

    /// Iterates over `(key, value)` pairs in blob order.
    ///
    /// Iteration ends at the empty-record marker or at the end of the buffer.
    /// A malformed record is yielded once as an error and ends iteration.
    pub fn records(&self) -> Records<'a> {
        Records {
            data: self.data,
            pos: 0,
            done: false,
        }
    }

    /// Returns the value of the first record whose key equals `key` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedRecord`] if a damaged record is reached
    /// before a match.
    pub fn get(&self, key: &str) -> Result<Option<&'a [u8]>, EnvError> {
        for record in self.records() {
            let (name, value) = record?;
            if name == key.as_bytes() {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Copies the value of `key` into `out` and NUL-terminates it.
    ///
    /// Values longer than `out.len() - 1` bytes are truncated to fit. Bytes
    /// after the terminator are zeroed. Returns the number of value bytes
    /// written, which is always less than `out.len()` when `out` is non-empty.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_into(&self, key: &str, out: &mut [u8]) -> Result<Option<usize>, EnvError> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };

        let len = value.len().min(out.len().saturating_sub(1));
        out[..len].copy_from_slice(&value[..len]);
        out[len..].fill(0);
        Ok(Some(len))
    }
}

/// Verifies `blob` and looks up `key` in one call.
///
/// # Errors
///
/// Any [`EnvError`] from [`UbootEnv::parse`] or [`UbootEnv::get`].
pub fn lookup<'a>(blob: &'a [u8], key: &str) -> Result<Option<&'a [u8]>, EnvError> {
    UbootEnv::parse(blob)?.get(key)
}

/// Iterator returned by [`UbootEnv::records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Records<'a> {
    fn malformed(&mut self, at: usize) -> Option<Result<(&'a [u8], &'a [u8]), EnvError>> {
        self.done = true;
        Some(Err(EnvError::MalformedRecord {
            offset: CRC_LEN + at,
        }))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(&'a [u8], &'a [u8]), EnvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let rest = self.data.get(start..).unwrap_or_default();
        if matches!(rest.first(), None | Some(0)) {
            self.done = true;
            return None;
        }

        let Some(eq) = rest.iter().position(|&b| b == b'=' || b == 0) else {
            return self.malformed(start);
        };
        if rest[eq] != b'=' {
            return self.malformed(start);
        }

        let value_region = &rest[eq + 1..];
        let Some(nul) = value_region.iter().position(|&b| b == 0) else {
            return self.malformed(start);
        };

        self.pos = start + eq + 1 + nul + 1;
        Some(Ok((&rest[..eq], &value_region[..nul])))
    }
}
