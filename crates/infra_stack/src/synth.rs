//! Plan synthesis: the single resolution pass.
//!
//! Walks the graph in deploy order, assigns each resource a deterministic
//! physical name and pseudo-provider attributes, and resolves every
//! attribute reference against resources provisioned earlier in the pass.
//! The result is the [`DeploymentPlan`] handed to the external provisioning
//! engine; retries, rollback and timeouts are that engine's concern.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use infra_core::naming::{fingerprint, physical_name};
use infra_core::{
    AttrKind, AttrRef, AttrValue, GraphError, LogicalId, OutputSet, ProvisionedAttrs,
    ResourceKind, ResourceSpec,
};

use crate::config::Environment;
use crate::stack::{
    StackError, StreamsStack, OUTPUT_API_GATEWAY_ID, OUTPUT_API_GATEWAY_URL,
    OUTPUT_API_RECORD_NAME, OUTPUT_CERTIFICATE_ID, OUTPUT_CUSTOM_DOMAIN, OUTPUT_HEALTHCHECK_URL,
    OUTPUT_HOSTED_ZONE_NAME,
};

/// One provisioned resource in deploy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResource {
    pub id: LogicalId,
    pub kind: ResourceKind,
    pub physical_name: String,
    pub depends_on: Vec<LogicalId>,
    pub attributes: ProvisionedAttrs,
}

/// The serialized hand-off to the provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub stack_name: String,
    pub environment: Environment,
    pub synthesized_at: String,
    pub resources: Vec<ResolvedResource>,
    pub outputs: OutputSet,
}

/// Resolve the declared stack into a deployment plan.
pub fn synthesize(stack: &StreamsStack) -> Result<DeploymentPlan, StackError> {
    let order = stack.graph.deploy_order()?;
    let environment = &stack.config.environment;
    let stack_name = &stack.config.stack_name;

    let mut provisioned: BTreeMap<LogicalId, ProvisionedAttrs> = BTreeMap::new();
    let mut resources = Vec::with_capacity(order.len());

    for id in &order {
        let node = stack
            .graph
            .get(id)
            .ok_or_else(|| GraphError::UnknownReference {
                from: id.clone(),
                to: id.clone(),
            })?;
        let name = physical_name(stack_name, id, node.kind());
        let attributes = provision(stack_name, environment, &name, &node.spec, &provisioned)?;
        provisioned.insert(id.clone(), attributes.clone());
        resources.push(ResolvedResource {
            id: id.clone(),
            kind: node.kind(),
            physical_name: name,
            depends_on: node.prerequisites().into_iter().cloned().collect(),
            attributes,
        });
    }

    let outputs = collect_outputs(stack, &provisioned)?;

    Ok(DeploymentPlan {
        stack_name: stack_name.clone(),
        environment: environment.clone(),
        synthesized_at: Utc::now().to_rfc3339(),
        resources,
        outputs,
    })
}

fn lookup<'a>(
    provisioned: &'a BTreeMap<LogicalId, ProvisionedAttrs>,
    reference: &AttrRef,
) -> Result<&'a AttrValue, GraphError> {
    provisioned
        .get(&reference.resource)
        .and_then(|attrs| attrs.get(&reference.attr))
        .ok_or_else(|| GraphError::UnresolvedAttr {
            id: reference.resource.clone(),
            attr: reference.attr,
        })
}

/// Assign pseudo-provider attributes for one resource. Values are derived
/// from the stack name and physical name so repeated synth runs agree.
fn provision(
    stack_name: &str,
    environment: &Environment,
    physical: &str,
    spec: &ResourceSpec,
    provisioned: &BTreeMap<LogicalId, ProvisionedAttrs>,
) -> Result<ProvisionedAttrs, GraphError> {
    let digest = fingerprint(&[stack_name, physical]);
    let mut attributes = ProvisionedAttrs::new();

    match spec {
        ResourceSpec::HostedZone { .. } => {
            attributes.insert(
                AttrKind::ZoneId,
                AttrValue::Text(format!("Z{}", &digest[..13].to_uppercase())),
            );
            attributes.insert(
                AttrKind::NameServers,
                AttrValue::List(name_servers(&digest)),
            );
        }
        ResourceSpec::DelegationRecord {
            record_name,
            name_servers,
            ..
        } => {
            // Ordering guarantee: the child zone resolved earlier in the
            // pass, or this fails with UnresolvedAttr.
            let servers = lookup(provisioned, name_servers)?.clone();
            attributes.insert(AttrKind::RecordName, AttrValue::Text(record_name.clone()));
            attributes.insert(AttrKind::NameServers, servers);
        }
        ResourceSpec::Certificate { .. } => {
            attributes.insert(
                AttrKind::CertificateArn,
                AttrValue::Text(format!(
                    "arn:aws:acm:{}:{}:certificate/{}-{}-{}-{}-{}",
                    environment.region,
                    environment.account,
                    &digest[..8],
                    &digest[8..12],
                    &digest[12..16],
                    &digest[16..20],
                    &digest[20..32],
                )),
            );
        }
        ResourceSpec::Function { .. } => {
            attributes.insert(
                AttrKind::FunctionArn,
                AttrValue::Text(format!(
                    "arn:aws:lambda:{}:{}:function:{physical}",
                    environment.region, environment.account,
                )),
            );
        }
        ResourceSpec::RestApi { .. } => {
            let api_id = digest[..10].to_string();
            attributes.insert(
                AttrKind::ApiEndpoint,
                AttrValue::Text(format!(
                    "https://{api_id}.execute-api.{}.amazonaws.com/prod",
                    environment.region,
                )),
            );
            attributes.insert(AttrKind::ApiId, AttrValue::Text(api_id));
        }
        ResourceSpec::WebSocketApi { .. } => {
            let api_id = digest[..10].to_string();
            attributes.insert(
                AttrKind::ApiEndpoint,
                AttrValue::Text(format!(
                    "wss://{api_id}.execute-api.{}.amazonaws.com/prod",
                    environment.region,
                )),
            );
            attributes.insert(AttrKind::ApiId, AttrValue::Text(api_id));
        }
        ResourceSpec::EventStream { stream_name } => {
            attributes.insert(
                AttrKind::StreamArn,
                AttrValue::Text(format!(
                    "arn:aws:kinesis:{}:{}:stream/{stream_name}",
                    environment.region, environment.account,
                )),
            );
        }
        ResourceSpec::AliasRecord { record_name, .. }
        | ResourceSpec::DomainBinding {
            domain_name: record_name,
            ..
        } => {
            attributes.insert(AttrKind::RecordName, AttrValue::Text(record_name.clone()));
        }
    }

    Ok(attributes)
}

/// Four delegation name servers, stable per zone.
fn name_servers(digest: &str) -> Vec<String> {
    const SUFFIXES: [&str; 4] = ["org", "com", "net", "co.uk"];
    SUFFIXES
        .iter()
        .enumerate()
        .map(|(index, suffix)| {
            let shard = u16::from_str_radix(&digest[index * 3..index * 3 + 3], 16).unwrap_or(0);
            format!("ns-{shard}.awsdns-{index:02}.{suffix}.")
        })
        .collect()
}

fn text_attr(
    provisioned: &BTreeMap<LogicalId, ProvisionedAttrs>,
    id: &LogicalId,
    attr: AttrKind,
) -> Result<String, GraphError> {
    let value = lookup(provisioned, &AttrRef::new(id.clone(), attr))?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| GraphError::UnresolvedAttr {
            id: id.clone(),
            attr,
        })
}

fn collect_outputs(
    stack: &StreamsStack,
    provisioned: &BTreeMap<LogicalId, ProvisionedAttrs>,
) -> Result<OutputSet, StackError> {
    let api = &stack.http_gateway.api;
    let api_id = text_attr(provisioned, api, AttrKind::ApiId)?;
    let api_url = text_attr(provisioned, api, AttrKind::ApiEndpoint)?;
    let certificate_arn = text_attr(
        provisioned,
        &stack.subdomain.certificate,
        AttrKind::CertificateArn,
    )?;
    let record_name = text_attr(
        provisioned,
        &stack.http_gateway.alias_record,
        AttrKind::RecordName,
    )?;

    let mut outputs = OutputSet::new();
    outputs.declare(OUTPUT_API_GATEWAY_ID, api_id)?;
    outputs.declare(OUTPUT_API_GATEWAY_URL, api_url.clone())?;
    outputs.declare(OUTPUT_CUSTOM_DOMAIN, stack.subdomain.full_domain.as_str())?;
    outputs.declare(
        OUTPUT_HOSTED_ZONE_NAME,
        stack.subdomain.full_domain.as_str(),
    )?;
    outputs.declare(OUTPUT_CERTIFICATE_ID, certificate_arn)?;
    outputs.declare(OUTPUT_API_RECORD_NAME, record_name)?;
    outputs.declare(OUTPUT_HEALTHCHECK_URL, format!("{api_url}/v1/health"))?;
    Ok(outputs)
}
