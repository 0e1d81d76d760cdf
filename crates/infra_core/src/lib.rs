//! Shared infrastructure-graph domain primitives.
//!
//! This crate owns the declarative resource model: typed resource
//! descriptors, the dependency graph with cycle detection and deterministic
//! deploy/teardown ordering, attribute references, and the deployment
//! output set. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `infra_stack` and `infra_lambda`.

pub mod error;
pub mod graph;
pub mod naming;
pub mod outputs;
pub mod resource;

pub use error::GraphError;
pub use graph::{ResourceGraph, ResourceNode};
pub use outputs::OutputSet;
pub use resource::{
    AttrKind, AttrRef, AttrValue, LogicalId, ProvisionedAttrs, ResourceKind, ResourceSpec, Route,
    ZoneRef,
};
