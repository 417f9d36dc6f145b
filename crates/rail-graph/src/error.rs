//! Graph-subsystem error type.

use thiserror::Error;

use rail_core::{Node, Pose};

use crate::Edge;

/// Errors produced by `rail-graph`.
///
/// The first group (`SelfLoop` … `InvalidSignal`) is the *invalid topology*
/// family: the mutation was rejected and the graph is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("edge from {0} to itself")]
    SelfLoop(Node),

    #[error("{a} and {b} are not adjacent grid points")]
    NotAdjacent { a: Node, b: Node },

    #[error("edge {edge} already exists with different attributes")]
    InconsistentEdge { edge: Edge },

    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("a signal already exists at {0}")]
    DuplicateSignal(Pose),

    #[error("cannot place signal at {pose}: {reason}")]
    InvalidSignal { pose: Pose, reason: &'static str },

    #[error("node {0} not found in graph")]
    NodeNotFound(Node),

    #[error("edge {0} not found in graph")]
    EdgeNotFound(Edge),

    /// A precondition of a query was violated (e.g. pathfinder start node
    /// absent from the graph).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed graph archive: {0}")]
    MalformedArchive(String),
}

impl GraphError {
    /// `true` for errors that reject a topology mutation.
    pub fn is_invalid_topology(&self) -> bool {
        matches!(
            self,
            GraphError::SelfLoop(_)
                | GraphError::NotAdjacent { .. }
                | GraphError::InconsistentEdge { .. }
                | GraphError::InvalidAttribute(_)
                | GraphError::DuplicateSignal(_)
                | GraphError::InvalidSignal { .. }
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
