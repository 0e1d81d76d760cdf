//! The declarative resource graph.
//!
//! Construction is append-only: resources are declared once, dependency
//! edges point strictly from dependent to prerequisite, and `validate()`
//! rejects unknown references and cycles before any resolution pass runs.
//! Deploy order is a deterministic topological sort; teardown order is its
//! exact reverse.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::resource::{LogicalId, ResourceKind, ResourceSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: LogicalId,
    pub spec: ResourceSpec,
    pub depends_on: Vec<LogicalId>,
}

impl ResourceNode {
    pub fn new(id: impl Into<LogicalId>, spec: ResourceSpec) -> Self {
        Self {
            id: id.into(),
            spec,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, prerequisites: impl IntoIterator<Item = LogicalId>) -> Self {
        self.depends_on.extend(prerequisites);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }

    /// All prerequisite ids: explicit edges plus every id the spec refers to.
    pub fn prerequisites(&self) -> BTreeSet<&LogicalId> {
        self.depends_on
            .iter()
            .chain(self.spec.references())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    nodes: BTreeMap<LogicalId, ResourceNode>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource. Returns its logical id for wiring convenience.
    pub fn declare(&mut self, node: ResourceNode) -> Result<LogicalId, GraphError> {
        let id = node.id.clone();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateResource(id));
        }
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Add an explicit ordering edge from `dependent` to `prerequisite`.
    pub fn add_dependency(
        &mut self,
        dependent: &LogicalId,
        prerequisite: &LogicalId,
    ) -> Result<(), GraphError> {
        if !self.nodes.contains_key(prerequisite) {
            return Err(GraphError::UnknownReference {
                from: dependent.clone(),
                to: prerequisite.clone(),
            });
        }
        let node = self
            .nodes
            .get_mut(dependent)
            .ok_or_else(|| GraphError::UnknownReference {
                from: dependent.clone(),
                to: prerequisite.clone(),
            })?;
        if !node.depends_on.contains(prerequisite) {
            node.depends_on.push(prerequisite.clone());
        }
        Ok(())
    }

    pub fn get(&self, id: &LogicalId) -> Option<&ResourceNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &LogicalId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }

    /// Check every reference resolves and the edge relation is acyclic.
    ///
    /// Runs at graph-construction time so a circular declaration (for
    /// example a gateway and certificate referencing each other) can never
    /// reach the provisioning engine.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in self.nodes.values() {
            for prerequisite in node.prerequisites() {
                if !self.nodes.contains_key(prerequisite) {
                    return Err(GraphError::UnknownReference {
                        from: node.id.clone(),
                        to: prerequisite.clone(),
                    });
                }
            }
        }
        self.find_cycle()
    }

    /// Deterministic topological deploy order (prerequisites first, ties
    /// broken by logical id).
    pub fn deploy_order(&self) -> Result<Vec<LogicalId>, GraphError> {
        self.validate()?;

        let mut pending: BTreeMap<&LogicalId, BTreeSet<&LogicalId>> = self
            .nodes
            .values()
            .map(|node| (&node.id, node.prerequisites()))
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while !pending.is_empty() {
            let ready: Vec<&LogicalId> = pending
                .iter()
                .filter(|(_, prerequisites)| prerequisites.is_empty())
                .map(|(id, _)| *id)
                .collect();
            // validate() already rejected cycles, so progress is guaranteed
            debug_assert!(!ready.is_empty());

            for id in &ready {
                pending.remove(*id);
            }
            for prerequisites in pending.values_mut() {
                for id in &ready {
                    prerequisites.remove(*id);
                }
            }
            order.extend(ready.into_iter().cloned());
        }
        Ok(order)
    }

    /// Teardown order: exact reverse of deploy order.
    pub fn teardown_order(&self) -> Result<Vec<LogicalId>, GraphError> {
        let mut order = self.deploy_order()?;
        order.reverse();
        Ok(order)
    }

    fn find_cycle(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            graph: &'a ResourceGraph,
            id: &'a LogicalId,
            marks: &mut BTreeMap<&'a LogicalId, Mark>,
            stack: &mut Vec<&'a LogicalId>,
        ) -> Option<Vec<LogicalId>> {
            match marks.get(id) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|member| *member == id).unwrap_or(0);
                    let mut cycle: Vec<LogicalId> =
                        stack[start..].iter().map(|member| (*member).clone()).collect();
                    cycle.push(id.clone());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            stack.push(id);
            if let Some(node) = graph.nodes.get(id) {
                for prerequisite in node.prerequisites() {
                    if let Some(cycle) = visit(graph, prerequisite, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
            stack.pop();
            marks.insert(id, Mark::Done);
            None
        }

        let mut marks = BTreeMap::new();
        for id in self.nodes.keys() {
            let mut stack = Vec::new();
            if let Some(cycle) = visit(self, id, &mut marks, &mut stack) {
                return Err(GraphError::DependencyCycle(cycle));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{AttrKind, AttrRef, ZoneRef};

    fn zone(id: &str, name: &str) -> ResourceNode {
        ResourceNode::new(
            id,
            ResourceSpec::HostedZone {
                zone_name: name.to_string(),
            },
        )
    }

    fn delegation(id: &str, child: &str) -> ResourceNode {
        ResourceNode::new(
            id,
            ResourceSpec::DelegationRecord {
                parent_zone: ZoneRef::Imported {
                    hosted_zone_id: "Z123".to_string(),
                    zone_name: "example.io".to_string(),
                },
                record_name: "sub.example.io".to_string(),
                name_servers: AttrRef::new(child, AttrKind::NameServers),
            },
        )
    }

    #[test]
    fn declare_rejects_duplicate_logical_ids() {
        let mut graph = ResourceGraph::new();
        graph.declare(zone("child-zone", "sub.example.io")).unwrap();
        let error = graph
            .declare(zone("child-zone", "other.example.io"))
            .unwrap_err();
        assert_eq!(
            error,
            GraphError::DuplicateResource(LogicalId::new("child-zone"))
        );
    }

    #[test]
    fn validate_rejects_dangling_spec_references() {
        let mut graph = ResourceGraph::new();
        graph.declare(delegation("ns-record", "child-zone")).unwrap();
        let error = graph.validate().unwrap_err();
        assert_eq!(
            error,
            GraphError::UnknownReference {
                from: LogicalId::new("ns-record"),
                to: LogicalId::new("child-zone"),
            }
        );
    }

    #[test]
    fn deploy_order_puts_prerequisites_first() {
        let mut graph = ResourceGraph::new();
        graph.declare(zone("child-zone", "sub.example.io")).unwrap();
        graph.declare(delegation("ns-record", "child-zone")).unwrap();
        graph
            .declare(
                ResourceNode::new(
                    "certificate",
                    ResourceSpec::Certificate {
                        domain_name: "sub.example.io".to_string(),
                        certificate_name: "sub.example.io subdomain wildcard cert".to_string(),
                        subject_alternative_names: vec!["*.sub.example.io".to_string()],
                        validation_zone: LogicalId::new("child-zone"),
                    },
                )
                .depends_on([LogicalId::new("ns-record")]),
            )
            .unwrap();

        let order = graph.deploy_order().unwrap();
        let position = |id: &str| {
            order
                .iter()
                .position(|member| member.as_str() == id)
                .unwrap()
        };
        assert!(position("child-zone") < position("ns-record"));
        assert!(position("ns-record") < position("certificate"));
    }

    #[test]
    fn deploy_order_is_deterministic_for_independent_nodes() {
        let mut graph = ResourceGraph::new();
        graph.declare(zone("zone-b", "b.example.io")).unwrap();
        graph.declare(zone("zone-a", "a.example.io")).unwrap();
        graph.declare(zone("zone-c", "c.example.io")).unwrap();

        let order = graph.deploy_order().unwrap();
        assert_eq!(
            order,
            vec![
                LogicalId::new("zone-a"),
                LogicalId::new("zone-b"),
                LogicalId::new("zone-c"),
            ]
        );
    }

    #[test]
    fn teardown_order_reverses_deploy_order() {
        let mut graph = ResourceGraph::new();
        graph.declare(zone("child-zone", "sub.example.io")).unwrap();
        graph.declare(delegation("ns-record", "child-zone")).unwrap();

        let mut deploy = graph.deploy_order().unwrap();
        deploy.reverse();
        assert_eq!(deploy, graph.teardown_order().unwrap());
    }

    #[test]
    fn validate_names_cycle_members() {
        let mut graph = ResourceGraph::new();
        graph.declare(zone("zone-a", "a.example.io")).unwrap();
        graph.declare(zone("zone-b", "b.example.io")).unwrap();
        graph
            .add_dependency(&LogicalId::new("zone-a"), &LogicalId::new("zone-b"))
            .unwrap();
        graph
            .add_dependency(&LogicalId::new("zone-b"), &LogicalId::new("zone-a"))
            .unwrap();

        match graph.validate().unwrap_err() {
            GraphError::DependencyCycle(members) => {
                assert!(members.contains(&LogicalId::new("zone-a")));
                assert!(members.contains(&LogicalId::new("zone-b")));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
