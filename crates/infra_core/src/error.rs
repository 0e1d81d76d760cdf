use thiserror::Error;

use crate::resource::{AttrKind, LogicalId};

/// Errors raised while declaring or resolving the resource graph.
///
/// All of these surface at graph-construction time; once a graph passes
/// `validate()` the resolution pass cannot encounter ordering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("resource '{0}' is already declared")]
    DuplicateResource(LogicalId),

    #[error("resource '{from}' references undeclared resource '{to}'")]
    UnknownReference { from: LogicalId, to: LogicalId },

    #[error("dependency cycle through: {}", .0.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(" -> "))]
    DependencyCycle(Vec<LogicalId>),

    #[error("output '{0}' is already declared")]
    DuplicateOutput(String),

    #[error("attribute {attr} of '{id}' requested before the resource was provisioned")]
    UnresolvedAttr { id: LogicalId, attr: AttrKind },
}
