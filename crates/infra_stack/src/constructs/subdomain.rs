//! Delegated subdomain: child zone, NS delegation, wildcard certificate.

use infra_core::{
    AttrKind, AttrRef, LogicalId, ResourceGraph, ResourceNode, ResourceSpec, ZoneRef,
};

use crate::domain::DomainName;
use crate::stack::StackError;

/// Inputs for delegating a subdomain out of an existing parent zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdomainSpec {
    pub label: String,
    pub parent_domain: String,
    pub parent_zone_id: String,
}

/// Handles to the declared resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedSubdomain {
    pub full_domain: DomainName,
    pub zone: LogicalId,
    pub delegation: LogicalId,
    pub certificate: LogicalId,
}

impl DelegatedSubdomain {
    /// Declare the child hosted zone, the NS record delegating it from the
    /// parent zone, and a DNS-validated wildcard certificate.
    ///
    /// The delegation record's name servers are an attribute of the child
    /// zone (unknown until the zone exists), and certificate validation
    /// requires the delegation to have propagated, so the edges here are
    /// zone -> delegation -> certificate. The certificate validates against
    /// the child zone, never the parent.
    pub fn declare(graph: &mut ResourceGraph, spec: &SubdomainSpec) -> Result<Self, StackError> {
        let full_domain = DomainName::subdomain(&spec.label, &spec.parent_domain)?;

        let zone = graph.declare(ResourceNode::new(
            format!("{full_domain}-hosted-zone"),
            ResourceSpec::HostedZone {
                zone_name: full_domain.as_str().to_string(),
            },
        ))?;

        let delegation = graph.declare(ResourceNode::new(
            format!("{}-parent-{}-ns-record", spec.label, spec.parent_domain),
            ResourceSpec::DelegationRecord {
                parent_zone: ZoneRef::Imported {
                    hosted_zone_id: spec.parent_zone_id.clone(),
                    zone_name: spec.parent_domain.clone(),
                },
                record_name: full_domain.as_str().to_string(),
                name_servers: AttrRef::new(zone.clone(), AttrKind::NameServers),
            },
        ))?;

        let certificate = graph.declare(
            ResourceNode::new(
                format!("{full_domain}-certificate"),
                ResourceSpec::Certificate {
                    domain_name: full_domain.as_str().to_string(),
                    certificate_name: format!("{full_domain} subdomain wildcard cert"),
                    subject_alternative_names: vec![full_domain.wildcard()],
                    validation_zone: zone.clone(),
                },
            )
            .depends_on([delegation.clone()]),
        )?;

        Ok(Self {
            full_domain,
            zone,
            delegation,
            certificate,
        })
    }
}
