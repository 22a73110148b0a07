//! LinkIt Smart 7688: the factory MAC address stored in the flash `factory` partition.

use super::{ProbeError, ProbeResult};
use crate::core::env_source::read_window;
use crate::{RawId, SystemRoot};

const FACTORY_PARTITION: &str = "/dev/mtd2";
const MAC_OFFSET: u64 = 4;
const MAC_LEN: usize = 6;

pub(super) fn probe(root: &SystemRoot) -> ProbeResult {
    let mac = read_window(&root.resolve(FACTORY_PARTITION), MAC_OFFSET, MAC_LEN)?;

    // Erased flash reads back as 0xff.
    if mac.iter().all(|&b| b == 0x00) || mac.iter().all(|&b| b == 0xff) {
        return Err(ProbeError::Unavailable(
            "LinkIt factory MAC address is not programmed".to_string(),
        ));
    }
    Ok(RawId::Binary(mac))
}
