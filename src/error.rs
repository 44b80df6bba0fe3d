//! Error types for graph mutation, construction and configuration.
//!
//! A rejected connection is not an error; see
//! [`RejectReason`](crate::validation::RejectReason).

use crate::graph::{EdgeId, HandleId, NodeId};
use std::fmt;

/// Which kind of entity an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// An add operation used an id that is already taken.
///
/// The store is left untouched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id already exists: {id}")]
pub struct DuplicateIdError {
    pub kind: EntityKind,
    pub id: String,
}

impl DuplicateIdError {
    pub fn node(id: &NodeId) -> Self {
        Self { kind: EntityKind::Node, id: id.to_string() }
    }

    pub fn edge(id: &EdgeId) -> Self {
        Self { kind: EntityKind::Edge, id: id.to_string() }
    }
}

/// Failure of a single graph store operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error(transparent)]
    DuplicateId(#[from] DuplicateIdError),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("node {node} has no handle {handle}")]
    UnknownHandle { node: NodeId, handle: HandleId },

    #[error("non-finite position for node {0}")]
    NonFinitePosition(NodeId),

    #[error("invalid size {width}x{height} for node {node}")]
    InvalidSize { node: NodeId, width: f32, height: f32 },
}

impl GraphError {
    /// The id of the entity the error is about.
    pub fn offending_id(&self) -> &str {
        match self {
            Self::DuplicateId(e) => &e.id,
            Self::NodeNotFound(id) | Self::NonFinitePosition(id) => id.as_str(),
            Self::EdgeNotFound(id) => id.as_str(),
            Self::DanglingEdge { edge, .. } => edge.as_str(),
            Self::UnknownHandle { node, .. } | Self::InvalidSize { node, .. } => node.as_str(),
        }
    }
}

/// The initial dataset handed to [`FlowEngine::new`](crate::FlowEngine::new)
/// violated one or more invariants. All violations are collected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed graph ({} violation(s)): {}", .violations.len(), join_violations(.violations))]
pub struct MalformedGraphError {
    pub violations: Vec<GraphError>,
}

impl MalformedGraphError {
    /// Ids of every offending node or edge, in the order found.
    pub fn offending_ids(&self) -> Vec<&str> {
        self.violations.iter().map(GraphError::offending_id).collect()
    }
}

fn join_violations(violations: &[GraphError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid zoom range [{min}, {max}]: need 0 < min <= max")]
    InvalidZoomRange { min: f32, max: f32 },

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
