//! Serial number reported by the kernel in `/proc/cpuinfo`.

use super::{ProbeError, ProbeResult};
use crate::{RawId, SystemRoot};
use std::fs;

const CPUINFO_PATH: &str = "/proc/cpuinfo";

pub(super) fn probe(root: &SystemRoot) -> ProbeResult {
    let path = root.resolve(CPUINFO_PATH);
    let contents = fs::read_to_string(&path)?;
    parse_serial(&contents)
        .map(|serial| RawId::Text(serial.to_string()))
        .ok_or_else(|| {
            ProbeError::Unavailable(format!("No usable serial number in {}", path.display()))
        })
}

/// Finds the `Serial : ...` line. Missing, empty, and all-zero serials are
/// treated as absent.
fn parse_serial(cpuinfo: &str) -> Option<&str> {
    cpuinfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "Serial")
        .map(|(_, value)| value.trim())
        .filter(|serial| !serial.is_empty() && serial.bytes().any(|b| b != b'0'))
}
