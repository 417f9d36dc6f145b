use thiserror::Error;

use rail_core::{CoreError, RouteId, ScheduleId};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{route} has {stops} stops; a route needs at least 2")]
    TooFewStops { route: RouteId, stops: usize },

    #[error("{0} has a zero frequency")]
    ZeroFrequency(RouteId),

    #[error("{0} has no departure left")]
    NoDeparture(ScheduleId),

    #[error("{0} not found")]
    RouteNotFound(RouteId),

    #[error("{0} not found")]
    ScheduleNotFound(ScheduleId),

    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
