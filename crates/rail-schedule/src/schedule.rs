//! `Schedule`: one run of a route at a concrete start time.
//!
//! # Projection
//!
//! ```text
//! stop 0      arrival = None                    departure = start
//! stop i      arrival = departure[i-1] + travel[i]
//!             departure = arrival[i] + dwell[i]
//! stop n-1    arrival = departure[n-2] + travel[n-1]   departure = None
//! ```
//!
//! A schedule never changes after projection except for its playback
//! pointer, which [`Schedule::depart_station`] moves one stop forward.

use rail_core::{Entity, RouteId, ScheduleId, StationId, Time};

use crate::{Route, ScheduleError, ScheduleResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleStop {
    pub station: StationId,
    pub arrival: Option<Time>,
    pub departure: Option<Time>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    pub id: ScheduleId,
    pub route: RouteId,
    pub start_time: Time,
    pub stops: Vec<ScheduleStop>,
    /// Index of the stop the train is standing at or heading to.
    pub position: usize,
}

impl Entity for Schedule {
    type Id = ScheduleId;

    fn id(&self) -> ScheduleId {
        self.id
    }
}

impl Schedule {
    /// Project `route` onto absolute times starting at `start_time`.
    pub fn from_route(id: ScheduleId, route: &Route, start_time: Time) -> ScheduleResult<Self> {
        let n = route.stops.len();
        if n < 2 {
            return Err(ScheduleError::TooFewStops { route: route.id, stops: n });
        }
        let mut stops = Vec::with_capacity(n);
        let mut departure = start_time;
        stops.push(ScheduleStop { station: route.stops[0].station, arrival: None, departure: Some(departure) });
        for (i, stop) in route.stops.iter().enumerate().skip(1) {
            let arrival = departure + stop.travel_time;
            if i == n - 1 {
                stops.push(ScheduleStop { station: stop.station, arrival: Some(arrival), departure: None });
            } else {
                departure = arrival + stop.dwell_time;
                stops.push(ScheduleStop { station: stop.station, arrival: Some(arrival), departure: Some(departure) });
            }
        }
        Ok(Self { id, route: route.id, start_time, stops, position: 0 })
    }

    pub fn current_stop(&self) -> Option<&ScheduleStop> {
        self.stops.get(self.position)
    }

    pub fn next_stop(&self) -> Option<&ScheduleStop> {
        self.stops.get(self.position + 1)
    }

    /// No departures left: the train is on its final leg or at its
    /// destination.
    pub fn is_finished(&self) -> bool {
        self.position + 1 >= self.stops.len()
    }

    /// Leave the current stop.  Returns the stop now being headed to.
    pub fn depart_station(&mut self) -> ScheduleResult<&ScheduleStop> {
        if self.is_finished() {
            return Err(ScheduleError::NoDeparture(self.id));
        }
        self.position += 1;
        self.stops.get(self.position).ok_or(ScheduleError::NoDeparture(self.id))
    }

    pub fn serves(&self, station: StationId) -> bool {
        self.stops.iter().any(|s| s.station == station)
    }

    /// Drop every stop at `station`, keeping the remaining times.  The new
    /// first and last stops lose their arrival and departure so the
    /// boundary still holds.  Returns `true` if any stop was dropped.
    pub fn remove_station(&mut self, station: StationId) -> bool {
        let removed_before = self.stops[..self.position.min(self.stops.len())]
            .iter()
            .filter(|s| s.station == station)
            .count();
        let before = self.stops.len();
        self.stops.retain(|s| s.station != station);
        if self.stops.len() == before {
            return false;
        }
        self.position = (self.position - removed_before).min(self.stops.len().saturating_sub(1));
        if let Some(first) = self.stops.first_mut() {
            first.arrival = None;
        }
        if let Some(last) = self.stops.last_mut() {
            last.departure = None;
        }
        true
    }
}
