use sha2::{Digest, Sha256};

use super::params::ScheduleParameters;

/// Content hash of a parameter snapshot, used as the idempotency and
/// correlation key between a request and its result.
///
/// The digest covers the JSON encoding of the snapshot with `input_hash`
/// cleared, so a snapshot hashes the same whether or not a hash from a prior
/// run is attached. Struct fields encode in declaration order, which makes
/// the encoding deterministic; list ordering is NOT canonicalized, so the
/// same ids supplied in a different order hash differently. That matches the
/// existing correlation semantics and is deliberate.
pub fn input_hash(params: &ScheduleParameters) -> Result<String, serde_json::Error> {
    let mut canonical = params.clone();
    canonical.input_hash = None;
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
