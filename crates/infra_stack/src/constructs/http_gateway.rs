//! HTTP gateway: REST API with a versioned health route, custom domain
//! binding and alias record.

use infra_core::{LogicalId, ResourceGraph, ResourceNode, ResourceSpec, Route};

use crate::constructs::require_certificate_coverage;
use crate::domain::DomainName;
use crate::stack::StackError;

/// Runtime tag for the packaged handler binaries.
pub const FUNCTION_RUNTIME: &str = "provided.al2023";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGatewaySpec {
    /// Domain the API is reachable under (for example `api.<subdomain>`).
    pub api_domain: DomainName,
    /// Certificate securing the custom domain; must cover `api_domain`.
    pub certificate: LogicalId,
    /// Zone receiving the alias record for `api_domain`.
    pub zone: LogicalId,
    /// Lambda handler backing the routes.
    pub handler_name: String,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGateway {
    pub api: LogicalId,
    pub handler: LogicalId,
    pub domain_binding: LogicalId,
    pub alias_record: LogicalId,
}

impl HttpGateway {
    /// Declare the backing function, the domain binding, the REST API and
    /// the alias record pointing the custom domain at the API.
    ///
    /// The binding references the certificate and the API references the
    /// binding; the certificate coverage check runs here so a binding for
    /// a domain the certificate cannot secure fails before synthesis.
    pub fn declare(graph: &mut ResourceGraph, spec: &HttpGatewaySpec) -> Result<Self, StackError> {
        require_certificate_coverage(graph, &spec.certificate, spec.api_domain.as_str())?;

        let handler = graph.declare(ResourceNode::new(
            "api-handler",
            ResourceSpec::Function {
                handler: spec.handler_name.clone(),
                runtime: FUNCTION_RUNTIME.to_string(),
            },
        ))?;

        let domain_binding = graph.declare(ResourceNode::new(
            format!("{}-domain-binding", spec.api_domain),
            ResourceSpec::DomainBinding {
                domain_name: spec.api_domain.as_str().to_string(),
                certificate: spec.certificate.clone(),
            },
        ))?;

        let api = graph.declare(ResourceNode::new(
            format!("{}-lambda-rest-api", spec.api_domain),
            ResourceSpec::RestApi {
                handler: handler.clone(),
                routes: spec.routes.clone(),
                domain_binding: Some(domain_binding.clone()),
            },
        ))?;

        let alias_record = graph.declare(ResourceNode::new(
            format!("{}-api-alias-record", spec.api_domain),
            ResourceSpec::AliasRecord {
                zone: spec.zone.clone(),
                record_name: spec.api_domain.as_str().to_string(),
                target_api: api.clone(),
            },
        ))?;

        Ok(Self {
            api,
            handler,
            domain_binding,
            alias_record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::{DelegatedSubdomain, SubdomainSpec};

    fn declared_subdomain(graph: &mut ResourceGraph) -> DelegatedSubdomain {
        DelegatedSubdomain::declare(
            graph,
            &SubdomainSpec {
                label: "twitch-streams".to_string(),
                parent_domain: "nickswiss.io".to_string(),
                parent_zone_id: "Z0423423".to_string(),
            },
        )
        .unwrap()
    }

    fn gateway_spec(subdomain: &DelegatedSubdomain) -> HttpGatewaySpec {
        HttpGatewaySpec {
            api_domain: subdomain.full_domain.child("api").unwrap(),
            certificate: subdomain.certificate.clone(),
            zone: subdomain.zone.clone(),
            handler_name: "health".to_string(),
            routes: vec![Route::get("/v1/health")],
        }
    }

    #[test]
    fn declares_api_behind_custom_domain() {
        let mut graph = ResourceGraph::new();
        let subdomain = declared_subdomain(&mut graph);
        let gateway = HttpGateway::declare(&mut graph, &gateway_spec(&subdomain)).unwrap();

        graph.validate().unwrap();
        let order = graph.deploy_order().unwrap();
        let position = |id: &LogicalId| order.iter().position(|member| member == id).unwrap();
        assert!(position(&subdomain.certificate) < position(&gateway.domain_binding));
        assert!(position(&gateway.domain_binding) < position(&gateway.api));
        assert!(position(&gateway.api) < position(&gateway.alias_record));
    }

    #[test]
    fn rejects_domain_the_certificate_does_not_cover() {
        let mut graph = ResourceGraph::new();
        let subdomain = declared_subdomain(&mut graph);

        let mut spec = gateway_spec(&subdomain);
        spec.api_domain = DomainName::parse("api.other.nickswiss.io").unwrap();
        let error = HttpGateway::declare(&mut graph, &spec).unwrap_err();
        assert!(matches!(error, StackError::CertificateMismatch { .. }));
    }

    #[test]
    fn rejects_certificate_reference_to_non_certificate() {
        let mut graph = ResourceGraph::new();
        let subdomain = declared_subdomain(&mut graph);

        let mut spec = gateway_spec(&subdomain);
        spec.certificate = subdomain.zone.clone();
        let error = HttpGateway::declare(&mut graph, &spec).unwrap_err();
        assert!(matches!(error, StackError::UnknownCertificate(_)));
    }
}
