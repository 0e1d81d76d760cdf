//! The three constructs making up the stack.
//!
//! Each construct declares its resources into a shared [`ResourceGraph`]
//! and returns the logical ids callers wire into downstream constructs.
//! References run strictly one way, from dependent to prerequisite, so a
//! circular declaration cannot be expressed.
//!
//! [`ResourceGraph`]: infra_core::ResourceGraph

mod http_gateway;
mod streaming_gateway;
mod subdomain;

pub use http_gateway::{HttpGateway, HttpGatewaySpec};
pub use streaming_gateway::{StreamingGateway, StreamingGatewaySpec};
pub use subdomain::{DelegatedSubdomain, SubdomainSpec};

use infra_core::{LogicalId, ResourceGraph, ResourceSpec};

use crate::domain::certificate_covers;
use crate::stack::StackError;

/// Check that `certificate` is a declared certificate whose covered-domain
/// set (primary + alternative names) includes `domain`. Runs while the
/// graph is being built, so a mismatched binding never reaches the
/// provisioning engine.
pub(crate) fn require_certificate_coverage(
    graph: &ResourceGraph,
    certificate: &LogicalId,
    domain: &str,
) -> Result<(), StackError> {
    let node = graph
        .get(certificate)
        .ok_or_else(|| StackError::UnknownCertificate(certificate.clone()))?;
    match &node.spec {
        ResourceSpec::Certificate {
            domain_name,
            subject_alternative_names,
            ..
        } => {
            if certificate_covers(domain_name, subject_alternative_names, domain) {
                Ok(())
            } else {
                Err(StackError::CertificateMismatch {
                    domain: domain.to_string(),
                    certificate: certificate.clone(),
                })
            }
        }
        _ => Err(StackError::UnknownCertificate(certificate.clone())),
    }
}
