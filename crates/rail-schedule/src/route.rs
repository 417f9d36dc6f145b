//! `Route`: a reusable service template.
//!
//! A route lists its stops with relative times only: how long the leg into
//! a stop takes and how long trains dwell there.  Absolute times appear
//! only once a route is instantiated as a [`Schedule`](crate::Schedule).
//!
//! The first stop's `travel_time` and `dwell_time` are ignored (trains
//! start there), and so is the last stop's `dwell_time`.

use rail_core::{Duration, Entity, RouteId, StationId, Time};

use crate::{ScheduleError, ScheduleResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStop {
    pub station: StationId,
    /// Time from the previous stop's departure to the arrival here.
    pub travel_time: Duration,
    pub dwell_time: Duration,
}

impl RouteStop {
    pub fn new(station: StationId, travel_time: Duration, dwell_time: Duration) -> Self {
        Self { station, travel_time, dwell_time }
    }

    /// An origin stop: no leg leads into it.
    pub fn origin(station: StationId) -> Self {
        Self::new(station, Duration::ZERO, Duration::ZERO)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub stops: Vec<RouteStop>,
    /// Headway between successive trains.
    pub frequency: Duration,
    pub first_train: Time,
    /// Start time of the last train of the day.  Earlier than
    /// `first_train` for services that run past midnight.
    pub last_train: Time,
}

impl Entity for Route {
    type Id = RouteId;

    fn id(&self) -> RouteId {
        self.id
    }
}

impl Route {
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        stops: Vec<RouteStop>,
        frequency: Duration,
        first_train: Time,
        last_train: Time,
    ) -> Self {
        Self { id, name: name.into(), stops, frequency, first_train, last_train }
    }

    /// A route can be timetabled only with two or more stops and a
    /// non-zero headway.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.stops.len() < 2 {
            return Err(ScheduleError::TooFewStops { route: self.id, stops: self.stops.len() });
        }
        if self.frequency == Duration::ZERO {
            return Err(ScheduleError::ZeroFrequency(self.id));
        }
        Ok(())
    }

    /// Origin-departure to destination-arrival time: travel plus dwell of
    /// every interior stop, plus the final leg.
    pub fn full_travel_time(&self) -> Duration {
        match self.stops.len() {
            0 | 1 => Duration::ZERO,
            n => {
                let interior: Duration = self.stops[1..n - 1]
                    .iter()
                    .map(|s| s.travel_time + s.dwell_time)
                    .sum();
                interior + self.stops[n - 1].travel_time
            }
        }
    }

    pub fn serves(&self, station: StationId) -> bool {
        self.stops.iter().any(|s| s.station == station)
    }

    /// Drop every stop at `station`.  Returns `true` if any was dropped.
    pub fn remove_station(&mut self, station: StationId) -> bool {
        let before = self.stops.len();
        self.stops.retain(|s| s.station != station);
        self.stops.len() != before
    }
}
