//! Stack composition for the twitch-streams deployment.
//!
//! This crate assembles the declarative resource graph out of three
//! constructs and hands the result to an external provisioning engine as a
//! JSON deployment plan:
//!
//! - [`constructs::DelegatedSubdomain`]: child hosted zone, NS delegation
//!   from the parent zone, DNS-validated wildcard certificate.
//! - [`constructs::HttpGateway`]: REST API with a health route, custom
//!   domain binding and alias record in the child zone.
//! - [`constructs::StreamingGateway`]: ordered event stream plus a
//!   websocket API with connect/disconnect/default routes.
//!
//! Configuration is resolved once at process entry ([`config::StackConfig`])
//! and passed down; no construct reads the parameter store on its own.

pub mod config;
pub mod constructs;
pub mod domain;
pub mod stack;
pub mod synth;

pub use config::{Environment, ParameterStore, StackConfig, StaticParameterStore};
pub use domain::DomainName;
pub use stack::{StackError, StreamsStack};
pub use synth::{synthesize, DeploymentPlan};
