//! Typed resource descriptors.
//!
//! Every declared resource is a `(LogicalId, ResourceKind, ResourceSpec)`
//! triple. Specs reference other resources either by logical id (a
//! same-graph dependency) or through an [`AttrRef`] when the referenced
//! value only exists after the target has been provisioned (for example a
//! child zone's name servers).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable per-stack name of a declared resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LogicalId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    HostedZone,
    DelegationRecord,
    Certificate,
    RestApi,
    WebSocketApi,
    EventStream,
    Function,
    AliasRecord,
    DomainBinding,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostedZone => "hosted_zone",
            Self::DelegationRecord => "delegation_record",
            Self::Certificate => "certificate",
            Self::RestApi => "rest_api",
            Self::WebSocketApi => "websocket_api",
            Self::EventStream => "event_stream",
            Self::Function => "function",
            Self::AliasRecord => "alias_record",
            Self::DomainBinding => "domain_binding",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-assigned attribute of a provisioned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKind {
    ZoneId,
    NameServers,
    CertificateArn,
    ApiId,
    ApiEndpoint,
    StreamArn,
    FunctionArn,
    RecordName,
}

impl AttrKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZoneId => "zone_id",
            Self::NameServers => "name_servers",
            Self::CertificateArn => "certificate_arn",
            Self::ApiId => "api_id",
            Self::ApiEndpoint => "api_endpoint",
            Self::StreamArn => "stream_arn",
            Self::FunctionArn => "function_arn",
            Self::RecordName => "record_name",
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an attribute that only resolves after `resource` has been
/// provisioned. Declaring one implies a dependency edge on `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrRef {
    pub resource: LogicalId,
    pub attr: AttrKind,
}

impl AttrRef {
    pub fn new(resource: impl Into<LogicalId>, attr: AttrKind) -> Self {
        Self {
            resource: resource.into(),
            attr,
        }
    }
}

/// Resolved attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(values) => Some(values),
        }
    }
}

/// Attributes assigned to one resource during the resolution pass.
pub type ProvisionedAttrs = BTreeMap<AttrKind, AttrValue>;

/// A hosted zone reference: either declared in this graph or imported from
/// attributes of a zone that already exists outside the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRef {
    Declared(LogicalId),
    Imported {
        hosted_zone_id: String,
        zone_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: String,
    pub path: String,
}

impl Route {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
        }
    }
}

/// Typed descriptor for each resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSpec {
    HostedZone {
        zone_name: String,
    },
    /// NS record in the parent zone handing resolution authority to the
    /// child zone. The name-server values are unknown until the child zone
    /// exists, hence the attribute reference.
    DelegationRecord {
        parent_zone: ZoneRef,
        record_name: String,
        name_servers: AttrRef,
    },
    Certificate {
        domain_name: String,
        certificate_name: String,
        subject_alternative_names: Vec<String>,
        validation_zone: LogicalId,
    },
    Function {
        handler: String,
        runtime: String,
    },
    RestApi {
        handler: LogicalId,
        routes: Vec<Route>,
        domain_binding: Option<LogicalId>,
    },
    WebSocketApi {
        connect_handler: LogicalId,
        disconnect_handler: LogicalId,
        default_handler: LogicalId,
    },
    EventStream {
        stream_name: String,
    },
    AliasRecord {
        zone: LogicalId,
        record_name: String,
        target_api: LogicalId,
    },
    DomainBinding {
        domain_name: String,
        certificate: LogicalId,
    },
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::HostedZone { .. } => ResourceKind::HostedZone,
            Self::DelegationRecord { .. } => ResourceKind::DelegationRecord,
            Self::Certificate { .. } => ResourceKind::Certificate,
            Self::Function { .. } => ResourceKind::Function,
            Self::RestApi { .. } => ResourceKind::RestApi,
            Self::WebSocketApi { .. } => ResourceKind::WebSocketApi,
            Self::EventStream { .. } => ResourceKind::EventStream,
            Self::AliasRecord { .. } => ResourceKind::AliasRecord,
            Self::DomainBinding { .. } => ResourceKind::DomainBinding,
        }
    }

    /// Logical ids this spec refers to, in declaration order.
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            Self::HostedZone { .. } | Self::EventStream { .. } | Self::Function { .. } => {
                Vec::new()
            }
            Self::DelegationRecord {
                parent_zone,
                name_servers,
                ..
            } => {
                let mut refs = Vec::new();
                if let ZoneRef::Declared(id) = parent_zone {
                    refs.push(id);
                }
                refs.push(&name_servers.resource);
                refs
            }
            Self::Certificate {
                validation_zone, ..
            } => vec![validation_zone],
            Self::RestApi {
                handler,
                domain_binding,
                ..
            } => {
                let mut refs = vec![handler];
                if let Some(binding) = domain_binding {
                    refs.push(binding);
                }
                refs
            }
            Self::WebSocketApi {
                connect_handler,
                disconnect_handler,
                default_handler,
            } => vec![connect_handler, disconnect_handler, default_handler],
            Self::AliasRecord {
                zone, target_api, ..
            } => vec![zone, target_api],
            Self::DomainBinding { certificate, .. } => vec![certificate],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_id_serializes_transparently() {
        let id = LogicalId::new("child-zone");
        let json = serde_json::to_string(&id).expect("id should serialize");
        assert_eq!(json, "\"child-zone\"");
    }

    #[test]
    fn delegation_record_references_child_zone_and_declared_parent() {
        let spec = ResourceSpec::DelegationRecord {
            parent_zone: ZoneRef::Imported {
                hosted_zone_id: "Z123".to_string(),
                zone_name: "example.io".to_string(),
            },
            record_name: "sub.example.io".to_string(),
            name_servers: AttrRef::new("child-zone", AttrKind::NameServers),
        };
        let refs = spec.references();
        assert_eq!(refs, vec![&LogicalId::new("child-zone")]);

        let spec = ResourceSpec::DelegationRecord {
            parent_zone: ZoneRef::Declared(LogicalId::new("parent-zone")),
            record_name: "sub.example.io".to_string(),
            name_servers: AttrRef::new("child-zone", AttrKind::NameServers),
        };
        assert_eq!(spec.references().len(), 2);
    }

    #[test]
    fn attr_value_accessors_distinguish_shapes() {
        let text = AttrValue::Text("Z999".to_string());
        assert_eq!(text.as_text(), Some("Z999"));
        assert!(text.as_list().is_none());

        let list = AttrValue::List(vec!["ns1".to_string(), "ns2".to_string()]);
        assert_eq!(list.as_list().map(<[String]>::len), Some(2));
    }
}
