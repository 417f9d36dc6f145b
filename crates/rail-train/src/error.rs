//! Train-subsystem error type.

use thiserror::Error;

use rail_core::{CoreError, TrainId};
use rail_graph::Edge;

/// Errors produced by `rail-train`.
///
/// A placement that merely collides or runs out of track is *not* an error;
/// it comes back as an invalid [`Preview`](crate::Preview).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    #[error("edge {0} is not track in the graph")]
    EdgeNotInGraph(Edge),

    #[error("edge {edge} is occupied by {train}")]
    Occupied { edge: Edge, train: TrainId },

    /// The edge set given to `create_train` is not one simple path.
    #[error("edges do not form a single path: {0}")]
    InvalidRun(&'static str),

    #[error("run covers {available} m but the train is {required} m long")]
    InsufficientLength { available: u32, required: u32 },

    #[error("train {0} not found")]
    NotFound(TrainId),

    #[error("invalid train configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type TrainResult<T> = Result<T, TrainError>;
