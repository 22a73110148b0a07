//! NervesKey: an ATECC508A/608A whose OTP zone carries board provisioning data.
//!
//! OTP block 0 holds a 4-byte magic, 2 flag bytes, a 10-byte board name and a
//! 16-byte NUL-padded manufacturer serial number.

use super::atecc508a::{serial_from_config, Atecc508a, BLOCK_LEN, ZONE_CONFIG, ZONE_OTP};
use super::ProbeResult;
use crate::{IdentitySource, RawId, SystemRoot};
use std::ops::Range;

const OTP_MAGIC: [u8; 4] = [0x4e, 0x72, 0x76, 0x73];
const MANUFACTURER_SN: Range<usize> = 16..32;

pub(super) fn probe(source: &IdentitySource, root: &SystemRoot) -> ProbeResult {
    let mut chip = Atecc508a::open(source, root)?;
    let (otp, config) = chip.with_awake(|chip| {
        let otp = chip.read_block(ZONE_OTP, 0)?;
        let config = chip.read_block(ZONE_CONFIG, 0)?;
        Ok((otp, config))
    })?;
    Ok(identity(&otp, &config))
}

/// Prefers the provisioned manufacturer serial and falls back to the chip serial.
fn identity(otp: &[u8; BLOCK_LEN], config: &[u8; BLOCK_LEN]) -> RawId {
    match manufacturer_serial(otp) {
        Some(serial) => RawId::Text(serial),
        None => RawId::Binary(serial_from_config(config).to_vec()),
    }
}

fn manufacturer_serial(otp: &[u8; BLOCK_LEN]) -> Option<String> {
    if otp[..4] != OTP_MAGIC {
        return None;
    }

    let field = &otp[MANUFACTURER_SN];
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let serial = &field[..end];
    if serial.is_empty() || !serial.iter().all(u8::is_ascii_graphic) {
        return None;
    }
    Some(String::from_utf8_lossy(serial).into_owned())
}
