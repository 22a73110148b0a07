//! Identification sources.
//!
//! Each submodule reads one kind of hardware or firmware identifier. They all
//! share a single contract: [`probe`] either returns a [`RawId`] or a
//! [`ProbeError`], and every `ProbeError` means "this source did not work,
//! try the next one". The dispatch is a closed `match` over [`SourceKind`].

mod atecc508a;
mod beaglebone;
mod binfile;
mod cpuinfo;
mod force;
mod i2c;
mod linkit;
mod macaddr;
mod nerves_key;
mod uboot;

use crate::core::env_source::LoadError;
use crate::{IdentitySource, RawId, SourceKind, SystemRoot};
use std::io;

/// Why a source produced no identifier.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The device, file, or parameter is absent or unusable.
    #[error("{0}")]
    Unavailable(String),

    /// The source is well-formed but holds no entry under the requested name.
    #[error("'{0}' not found")]
    NotFound(String),

    /// A fixed window could not be read from its file, or the U-Boot
    /// environment it holds is invalid.
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ProbeError {
    /// Returns `true` when data was read but is invalid, which usually points
    /// at a wrong offset or size rather than a missing device.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Load(e) if e.is_corrupt())
    }
}

/// Outcome of a single probe.
pub type ProbeResult = std::result::Result<RawId, ProbeError>;

/// Runs the source described by `source`, resolving every path under `root`.
pub fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    match source.kind {
        SourceKind::CpuInfo => cpuinfo::probe(root),
        SourceKind::MacAddr => macaddr::probe(source, root),
        SourceKind::BeagleBoneBlack => beaglebone::probe(root),
        SourceKind::LinkIt => linkit::probe(root),
        SourceKind::BinFile => binfile::probe(source, root),
        SourceKind::UbootEnv => uboot::probe(source, root),
        SourceKind::Atecc508a => atecc508a::probe(source, root),
        SourceKind::NervesKey => nerves_key::probe(source, root),
        SourceKind::Force => force::probe(source),
    }
}

fn missing(source: &IdentitySource, what: &str) -> ProbeError {
    ProbeError::Unavailable(format!("{}: no {what} specified", source.name))
}
