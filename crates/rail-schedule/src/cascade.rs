//! Removing a station from everything that stops there.

use log::info;

use rail_core::{Repository, RouteId, ScheduleId, StationId};

use crate::{Route, Schedule, TimetableRepository};

/// What [`remove_station_from_all_stops`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopRemoval {
    /// Routes that lost at least one stop.
    pub routes: Vec<RouteId>,
    /// Schedules that lost stops but still run.
    pub schedules: Vec<ScheduleId>,
    /// Schedules left with fewer than two stops, now deleted.
    pub dropped_schedules: Vec<ScheduleId>,
}

/// Strip `station` from every route and schedule stop.
///
/// Routes are kept even if fewer than two stops remain, but their
/// timetables are emptied since they can no longer run.  Schedules with
/// fewer than two stops are deleted.
pub fn remove_station_from_all_stops(
    station: StationId,
    routes: &mut Repository<Route>,
    schedules: &mut Repository<Schedule>,
    timetables: &mut TimetableRepository,
) -> StopRemoval {
    let mut removal = StopRemoval::default();

    for route in routes.all_mut() {
        if route.remove_station(station) {
            removal.routes.push(route.id);
            if route.stops.len() < 2 {
                timetables.clear_start_times(route.id);
            }
        }
    }

    for schedule in schedules.all_mut() {
        if schedule.remove_station(station) {
            if schedule.stops.len() < 2 {
                removal.dropped_schedules.push(schedule.id);
            } else {
                removal.schedules.push(schedule.id);
            }
        }
    }
    for &id in &removal.dropped_schedules {
        schedules.remove(id);
    }

    if !removal.routes.is_empty() || !removal.schedules.is_empty() || !removal.dropped_schedules.is_empty() {
        info!(
            "{station} removed from {} routes and {} schedules ({} dropped)",
            removal.routes.len(),
            removal.schedules.len(),
            removal.dropped_schedules.len()
        );
    }
    removal
}
