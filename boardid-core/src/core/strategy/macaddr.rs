//! MAC address of a network interface.

use super::{ProbeError, ProbeResult};
use crate::{IdentitySource, RawId, SystemRoot};
use log::debug;
use std::fs;

const DEFAULT_INTERFACE: &str = "eth0";

pub(super) fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    let ifname = source.filename.as_deref().unwrap_or(DEFAULT_INTERFACE);
    let path = root.resolve(format!("/sys/class/net/{ifname}/address"));

    match fs::read_to_string(&path) {
        Ok(contents) => parse_mac(&contents).map(RawId::Text).ok_or_else(|| {
            ProbeError::Unavailable(format!("No usable MAC address in {}", path.display()))
        }),
        Err(e) if root.is_host() => {
            debug!("{}: {e}; asking the OS instead", path.display());
            from_os(ifname)
        }
        Err(e) => Err(e.into()),
    }
}

fn from_os(ifname: &str) -> ProbeResult {
    match mac_address::mac_address_by_name(ifname) {
        Ok(Some(mac)) if mac.bytes() != [0u8; 6] => Ok(RawId::Binary(mac.bytes().to_vec())),
        Ok(_) => Err(ProbeError::Unavailable(format!(
            "Could not determine MAC address of {ifname}"
        ))),
        Err(e) => Err(ProbeError::Unavailable(format!(
            "Failed to get MAC address of {ifname}: {e}"
        ))),
    }
}

/// Turns `aa:BB:cc:dd:ee:ff` into `aabbccddeeff`.
fn parse_mac(text: &str) -> Option<String> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| *c != ':')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let valid = digits.len() == 12
        && digits.chars().all(|c| c.is_ascii_hexdigit())
        && digits.chars().any(|c| c != '0');
    valid.then_some(digits)
}
