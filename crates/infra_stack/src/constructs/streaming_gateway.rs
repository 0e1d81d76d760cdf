//! Streaming gateway: ordered event stream plus a websocket API with
//! connect/disconnect/default lifecycle routes.

use infra_core::{LogicalId, ResourceGraph, ResourceNode, ResourceSpec};

use crate::constructs::http_gateway::FUNCTION_RUNTIME;
use crate::constructs::require_certificate_coverage;
use crate::domain::DomainName;
use crate::stack::StackError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingGatewaySpec {
    pub stream_name: String,
    /// Domain intended for the websocket endpoint (for example
    /// `kinesis.<subdomain>`); checked against the certificate even though
    /// the binding itself is not declared yet.
    pub domain: DomainName,
    pub certificate: LogicalId,
    pub zone: LogicalId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingGateway {
    pub stream: LogicalId,
    pub api: LogicalId,
    pub connect_handler: LogicalId,
    pub disconnect_handler: LogicalId,
    pub default_handler: LogicalId,
}

impl StreamingGateway {
    /// Declare the event stream, the three lifecycle handlers and the
    /// websocket API routing `$connect` / `$disconnect` / `$default` to
    /// them.
    ///
    /// The stream is declared without a consumer edge: no handler reads or
    /// writes it yet, and the read grant is an open gap (see DESIGN.md).
    /// The certificate/zone references are validated here but the
    /// custom-domain attachment for the websocket endpoint is not declared.
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &StreamingGatewaySpec,
    ) -> Result<Self, StackError> {
        require_certificate_coverage(graph, &spec.certificate, spec.domain.as_str())?;
        if !graph.contains(&spec.zone) {
            return Err(StackError::UnknownZone(spec.zone.clone()));
        }

        let stream = graph.declare(ResourceNode::new(
            "twitch-chat-stream",
            ResourceSpec::EventStream {
                stream_name: spec.stream_name.clone(),
            },
        ))?;

        let connect_handler = graph.declare(ResourceNode::new(
            "twitch-stream-connect-handler",
            ResourceSpec::Function {
                handler: "connect".to_string(),
                runtime: FUNCTION_RUNTIME.to_string(),
            },
        ))?;
        let disconnect_handler = graph.declare(ResourceNode::new(
            "twitch-stream-disconnect-handler",
            ResourceSpec::Function {
                handler: "disconnect".to_string(),
                runtime: FUNCTION_RUNTIME.to_string(),
            },
        ))?;
        let default_handler = graph.declare(ResourceNode::new(
            "twitch-stream-default-handler",
            ResourceSpec::Function {
                handler: "default_route".to_string(),
                runtime: FUNCTION_RUNTIME.to_string(),
            },
        ))?;

        let api = graph.declare(ResourceNode::new(
            "twitch-stream-websocket-api",
            ResourceSpec::WebSocketApi {
                connect_handler: connect_handler.clone(),
                disconnect_handler: disconnect_handler.clone(),
                default_handler: default_handler.clone(),
            },
        ))?;

        Ok(Self {
            stream,
            api,
            connect_handler,
            disconnect_handler,
            default_handler,
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

    #[test]
    fn declares_stream_and_three_lifecycle_handlers() {
        let mut graph = ResourceGraph::new();
        let subdomain = declared_subdomain(&mut graph);
        let gateway = StreamingGateway::declare(
            &mut graph,
            &StreamingGatewaySpec {
                stream_name: "twitch-chat-stream".to_string(),
                domain: subdomain.full_domain.child("kinesis").unwrap(),
                certificate: subdomain.certificate.clone(),
                zone: subdomain.zone.clone(),
            },
        )
        .unwrap();

        graph.validate().unwrap();
        let api = graph.get(&gateway.api).unwrap();
        match &api.spec {
            ResourceSpec::WebSocketApi {
                connect_handler,
                disconnect_handler,
                default_handler,
            } => {
                assert_eq!(*connect_handler, gateway.connect_handler);
                assert_eq!(*disconnect_handler, gateway.disconnect_handler);
                assert_eq!(*default_handler, gateway.default_handler);
            }
            other => panic!("expected websocket api spec, got {other:?}"),
        }
    }

    #[test]
    fn stream_has_no_consumer_edges() {
        let mut graph = ResourceGraph::new();
        let subdomain = declared_subdomain(&mut graph);
        let gateway = StreamingGateway::declare(
            &mut graph,
            &StreamingGatewaySpec {
                stream_name: "twitch-chat-stream".to_string(),
                domain: subdomain.full_domain.child("kinesis").unwrap(),
                certificate: subdomain.certificate.clone(),
                zone: subdomain.zone.clone(),
            },
        )
        .unwrap();

        // Nothing references the stream: it is provisioned but dangling.
        for node in graph.iter() {
            assert!(
                !node.prerequisites().contains(&gateway.stream),
                "resource '{}' unexpectedly depends on the stream",
                node.id
            );
        }
    }
}
