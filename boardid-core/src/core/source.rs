//! Strategy configuration: which identification sources to try and how.

use crate::{BoardIdError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the number of strategies tried in one run.
pub const MAX_STRATEGIES: usize = 8;

/// Longest identifier a single strategy may copy out of a text source.
pub const MAX_SERIAL_NUMBER_LEN: usize = 32;

/// Smallest U-Boot environment window that still holds a CRC and a terminator.
pub const MIN_UBOOT_ENV_SIZE: usize = 5;

/// Largest `binfile` read; its hex rendering fills [`MAX_SERIAL_NUMBER_LEN`].
pub const MAX_BINFILE_SIZE: usize = MAX_SERIAL_NUMBER_LEN / 2;

/// The closed set of identification methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "cpuinfo")]
    CpuInfo,
    #[serde(rename = "macaddr")]
    MacAddr,
    #[serde(rename = "bbb")]
    BeagleBoneBlack,
    #[serde(rename = "linkit")]
    LinkIt,
    #[serde(rename = "binfile")]
    BinFile,
    #[serde(rename = "uboot_env")]
    UbootEnv,
    #[serde(rename = "atecc508a")]
    Atecc508a,
    #[serde(rename = "nerves_key")]
    NervesKey,
    #[serde(rename = "force")]
    Force,
}

impl SourceKind {
    pub const ALL: [SourceKind; 9] = [
        Self::CpuInfo,
        Self::MacAddr,
        Self::BeagleBoneBlack,
        Self::LinkIt,
        Self::BinFile,
        Self::UbootEnv,
        Self::Atecc508a,
        Self::NervesKey,
        Self::Force,
    ];

    /// The name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CpuInfo => "cpuinfo",
            Self::MacAddr => "macaddr",
            Self::BeagleBoneBlack => "bbb",
            Self::LinkIt => "linkit",
            Self::BinFile => "binfile",
            Self::UbootEnv => "uboot_env",
            Self::Atecc508a => "atecc508a",
            Self::NervesKey => "nerves_key",
            Self::Force => "force",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = BoardIdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BoardIdError::InvalidConfig(format!("Unknown board or method: {s}")))
    }
}

/// One configured identification strategy.
///
/// Built once from the command line and never mutated afterwards. Which of
/// the optional fields are meaningful depends on [`kind`](Self::kind):
///
/// | kind | `filename` | `offset` | `size` | `variable_name` |
/// |------|------------|----------|--------|-----------------|
/// | `macaddr` | interface name | | | |
/// | `binfile` | file (required) | byte offset | byte count (required) | |
/// | `uboot_env` | file (required) | byte offset (required) | window size (required) | variable (required) |
/// | `atecc508a`, `nerves_key` | i2c bus device | i2c address | | |
/// | `force` | the identifier itself | | | |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySource {
    pub kind: SourceKind,
    pub name: String,
    pub digits: Option<usize>,
    pub filename: Option<String>,
    pub offset: Option<u64>,
    pub size: Option<usize>,
    pub variable_name: Option<String>,
}

impl IdentitySource {
    /// A source of `kind` with no parameters, named after its kind.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            digits: None,
            filename: None,
            offset: None,
            size: None,
            variable_name: None,
        }
    }

    /// A `uboot_env` source reading `variable_name` from the `size`-byte
    /// environment at `offset` within `filename`.
    pub fn uboot_env(filename: &str, offset: u64, size: usize, variable_name: &str) -> Self {
        Self {
            filename: Some(filename.to_string()),
            offset: Some(offset),
            size: Some(size),
            variable_name: Some(variable_name.to_string()),
            ..Self::new(SourceKind::UbootEnv)
        }
    }

    /// A `binfile` source reading `size` bytes at `offset` within `filename`.
    pub fn binfile(filename: &str, offset: u64, size: usize) -> Self {
        Self {
            filename: Some(filename.to_string()),
            offset: Some(offset),
            size: Some(size),
            ..Self::new(SourceKind::BinFile)
        }
    }

    /// A `force` source that always yields `id`.
    pub fn force(id: &str) -> Self {
        Self {
            filename: Some(id.to_string()),
            ..Self::new(SourceKind::Force)
        }
    }

    #[must_use]
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = Some(digits);
        self
    }

    /// Checks that every parameter the kind requires is present and in range.
    ///
    /// # Errors
    ///
    /// Returns [`BoardIdError::InvalidConfig`] naming the strategy and the
    /// offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.digits == Some(0) {
            return Err(self.invalid("digit count must be at least 1"));
        }

        match self.kind {
            SourceKind::UbootEnv => {
                self.require(self.filename.is_some(), "a filename (-f)")?;
                self.require(self.offset.is_some(), "an offset (-k)")?;
                let size = self.size.ok_or_else(|| self.invalid("requires a size (-l)"))?;
                if size < MIN_UBOOT_ENV_SIZE {
                    return Err(self.invalid(&format!(
                        "environment size must be at least {MIN_UBOOT_ENV_SIZE} bytes"
                    )));
                }
                let name = self
                    .variable_name
                    .as_deref()
                    .ok_or_else(|| self.invalid("requires a variable name (-u)"))?;
                if name.is_empty() || name.contains(['=', '\0']) {
                    return Err(self.invalid(&format!("invalid variable name '{name}'")));
                }
            }
            SourceKind::BinFile => {
                self.require(self.filename.is_some(), "a filename (-f)")?;
                let size = self.size.ok_or_else(|| self.invalid("requires a size (-l)"))?;
                if size == 0 || size > MAX_BINFILE_SIZE {
                    return Err(self.invalid(&format!(
                        "size must be between 1 and {MAX_BINFILE_SIZE} bytes"
                    )));
                }
            }
            SourceKind::Atecc508a | SourceKind::NervesKey => {
                if let Some(address) = self.offset {
                    if address > 0x7f {
                        return Err(self.invalid(&format!("invalid i2c address 0x{address:x}")));
                    }
                }
            }
            SourceKind::CpuInfo
            | SourceKind::MacAddr
            | SourceKind::BeagleBoneBlack
            | SourceKind::LinkIt
            | SourceKind::Force => {}
        }

        Ok(())
    }

    fn require(&self, present: bool, what: &str) -> Result<()> {
        if present {
            Ok(())
        } else {
            Err(self.invalid(&format!("requires {what}")))
        }
    }

    fn invalid(&self, msg: &str) -> BoardIdError {
        BoardIdError::InvalidConfig(format!("{}: {msg}", self.name))
    }
}
