//! Core library for boardid: derives a stable identifier for an embedded board.
//!
//! The primary entry point is [`Resolver`], which tries a list of
//! [`IdentitySource`]s in order and returns the first identifier found.
//! Sources range from `/proc/cpuinfo` and network MAC addresses to raw EEPROM
//! bytes, U-Boot environment variables, and crypto-chip serial numbers.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    env_source::{load_and_lookup, read_window, LoadError},
    error::{BoardIdError, Result},
    format::RawId,
    resolver::{ResolvedIdentity, Resolver},
    root::SystemRoot,
    source::{
        IdentitySource, SourceKind, MAX_BINFILE_SIZE, MAX_SERIAL_NUMBER_LEN, MAX_STRATEGIES,
        MIN_UBOOT_ENV_SIZE,
    },
    strategy::{probe, ProbeError, ProbeResult},
    uboot_env::{lookup, EnvError, UbootEnv},
};
