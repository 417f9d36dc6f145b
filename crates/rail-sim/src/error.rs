use thiserror::Error;

use rail_core::{CoreError, TrainId};
use rail_graph::{Edge, GraphError};
use rail_schedule::ScheduleError;
use rail_station::StationError;
use rail_train::TrainError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A document or route refers to something that does not exist.
    #[error("dangling reference: {0}")]
    Dangling(String),

    #[error("{edge} is occupied by {train}")]
    TrackInUse { edge: Edge, train: TrainId },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
