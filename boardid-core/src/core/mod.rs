//! Internal domain modules for the boardid core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod env_source;
pub mod error;
pub mod format;
pub mod resolver;
pub mod root;
pub mod source;
pub mod strategy;
pub mod uboot_env;

#[doc(inline)]
pub use env_source::{load_and_lookup, read_window, LoadError};
#[doc(inline)]
pub use error::{BoardIdError, Result};
#[doc(inline)]
pub use format::RawId;
#[doc(inline)]
pub use resolver::{ResolvedIdentity, Resolver};
#[doc(inline)]
pub use root::SystemRoot;
#[doc(inline)]
pub use source::{
    IdentitySource, SourceKind, MAX_BINFILE_SIZE, MAX_SERIAL_NUMBER_LEN, MAX_STRATEGIES,
    MIN_UBOOT_ENV_SIZE,
};
#[doc(inline)]
pub use strategy::{probe, ProbeError, ProbeResult};
#[doc(inline)]
pub use uboot_env::{lookup, EnvError, UbootEnv};

#[cfg(test)]
mod tests {
    #[test]
    fn test_reexports_match_crate_root() {
        assert_eq!(super::MIN_UBOOT_ENV_SIZE, crate::MIN_UBOOT_ENV_SIZE);
        assert_eq!(super::MAX_BINFILE_SIZE, crate::MAX_BINFILE_SIZE);
        assert_eq!(super::lookup(&[0u8; 2], "serial"), crate::lookup(&[0u8; 2], "serial"));
    }
}
