//! Station-subsystem error type.

use thiserror::Error;

use rail_core::{CoreError, Node, StationId};
use rail_graph::Edge;

/// Errors produced by `rail-station`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationError {
    #[error("station at {anchor} would overlap the footprint of {other}")]
    Overlap { anchor: Node, other: StationId },

    #[error("edge {edge} is already a platform of {station}")]
    PlatformConflict { edge: Edge, station: StationId },

    #[error("platform edge {0} is not track in the graph")]
    EdgeNotInGraph(Edge),

    #[error("a platform needs at least one edge")]
    EmptyPlatform,

    #[error("{station} has no platform containing {edge}")]
    NoSuchPlatform { station: StationId, edge: Edge },

    #[error("station {0} not found")]
    NotFound(StationId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StationError {
    /// `true` for errors that reject a station mutation on geometric or
    /// topological grounds.
    pub fn is_invalid_topology(&self) -> bool {
        matches!(
            self,
            StationError::Overlap { .. }
                | StationError::PlatformConflict { .. }
                | StationError::EdgeNotInGraph(_)
                | StationError::EmptyPlatform
        )
    }
}

pub type StationResult<T> = Result<T, StationError>;
