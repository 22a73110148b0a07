//! An identifier supplied directly on the command line.

use super::{missing, ProbeResult};
use crate::{IdentitySource, RawId};

pub(super) fn probe(source: &IdentitySource) -> ProbeResult {
    match source.filename.as_deref() {
        Some(id) if !id.is_empty() => Ok(RawId::Text(id.to_string())),
        _ => Err(missing(source, "ID")),
    }
}
