//! Top-level stack: subdomain, HTTP gateway, streaming gateway.

use infra_core::{GraphError, LogicalId, ResourceGraph, Route};
use thiserror::Error;

use crate::config::{ConfigError, StackConfig};
use crate::constructs::{
    DelegatedSubdomain, HttpGateway, HttpGatewaySpec, StreamingGateway, StreamingGatewaySpec,
    SubdomainSpec,
};

/// Output names emitted by a successful construction pass.
pub const OUTPUT_API_GATEWAY_ID: &str = "ApiGatewayId";
pub const OUTPUT_API_GATEWAY_URL: &str = "ApiGatewayUrl";
pub const OUTPUT_CUSTOM_DOMAIN: &str = "CustomDomain";
pub const OUTPUT_HOSTED_ZONE_NAME: &str = "HostedZoneName";
pub const OUTPUT_CERTIFICATE_ID: &str = "CertificateId";
pub const OUTPUT_API_RECORD_NAME: &str = "ApiRecordName";
pub const OUTPUT_HEALTHCHECK_URL: &str = "HealthcheckUrl";

/// All output names, in emission order.
pub const OUTPUT_NAMES: [&str; 7] = [
    OUTPUT_API_GATEWAY_ID,
    OUTPUT_API_GATEWAY_URL,
    OUTPUT_CUSTOM_DOMAIN,
    OUTPUT_HOSTED_ZONE_NAME,
    OUTPUT_CERTIFICATE_ID,
    OUTPUT_API_RECORD_NAME,
    OUTPUT_HEALTHCHECK_URL,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("'{0}' is not a declared certificate")]
    UnknownCertificate(LogicalId),

    #[error("'{0}' is not a declared hosted zone")]
    UnknownZone(LogicalId),

    #[error("certificate '{certificate}' does not cover domain '{domain}'")]
    CertificateMismatch {
        domain: String,
        certificate: LogicalId,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The fully declared deployment graph plus handles into it.
#[derive(Debug, Clone)]
pub struct StreamsStack {
    pub config: StackConfig,
    pub graph: ResourceGraph,
    pub subdomain: DelegatedSubdomain,
    pub http_gateway: HttpGateway,
    pub streaming_gateway: StreamingGateway,
}

impl StreamsStack {
    /// Build the whole graph from a resolved configuration: delegated
    /// subdomain first, then the two gateways referencing its certificate
    /// and zone, then validate the result.
    pub fn declare(config: StackConfig) -> Result<Self, StackError> {
        let mut graph = ResourceGraph::new();

        let subdomain = DelegatedSubdomain::declare(
            &mut graph,
            &SubdomainSpec {
                label: config.subdomain.clone(),
                parent_domain: config.parent_domain.clone(),
                parent_zone_id: config.parent_zone_id.clone(),
            },
        )?;

        let http_gateway = HttpGateway::declare(
            &mut graph,
            &HttpGatewaySpec {
                api_domain: subdomain.full_domain.child("api")?,
                certificate: subdomain.certificate.clone(),
                zone: subdomain.zone.clone(),
                handler_name: "health".to_string(),
                routes: vec![Route::get("/v1/health")],
            },
        )?;

        let streaming_gateway = StreamingGateway::declare(
            &mut graph,
            &StreamingGatewaySpec {
                stream_name: "twitch-chat-stream".to_string(),
                domain: subdomain.full_domain.child("kinesis")?,
                certificate: subdomain.certificate.clone(),
                zone: subdomain.zone.clone(),
            },
        )?;

        graph.validate()?;

        Ok(Self {
            config,
            graph,
            subdomain,
            http_gateway,
            streaming_gateway,
        })
    }
}
