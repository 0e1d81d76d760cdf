//! Deterministic physical-name derivation.
//!
//! The resolution pass assigns each resource a stable pseudo-provider
//! identifier derived from the stack name and logical id, so two synth runs
//! over the same graph always produce the same plan.

use sha2::{Digest, Sha256};

use crate::resource::{LogicalId, ResourceKind};

/// Length of the uniquifying hex suffix appended to physical names.
const SUFFIX_LEN: usize = 8;

pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Stable physical name: `<stack>-<logical id>-<hash suffix>`.
pub fn physical_name(stack_name: &str, id: &LogicalId, kind: ResourceKind) -> String {
    let digest = fingerprint(&[stack_name, id.as_str(), kind.as_str()]);
    format!("{stack_name}-{id}-{}", &digest[..SUFFIX_LEN])
}
