//! Timetables: the start times of each route's trains over one day.
//!
//! There is at most one timetable per route, keyed by `RouteId`.  Start
//! times are always sorted by time of day and free of duplicates.
//!
//! # Day range
//!
//! The day's start times run from `first_train` to `last_train` inclusive,
//! stepped by `frequency`.  When `last_train` is earlier than
//! `first_train` the range wraps past midnight:
//!
//! ```text
//! first 22:00, last 01:00, every 90 min  →  22:00 23:30 01:00
//! sorted                                 →  01:00 22:00 23:30
//! ```

use log::{debug, info, warn};

use rail_core::{Duration, Entity, Repository, RouteId, ScheduleId, Time};

use crate::{Route, Schedule, ScheduleError, ScheduleResult};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    pub route: RouteId,
    pub start_times: Vec<Time>,
}

impl Entity for Timetable {
    type Id = RouteId;

    fn id(&self) -> RouteId {
        self.route
    }
}

impl Timetable {
    pub fn new(route: RouteId) -> Self {
        Self { route, start_times: Vec::new() }
    }

    /// Insert keeping the list sorted.  Returns `false` if the time was
    /// already listed.
    pub fn insert(&mut self, time: Time) -> bool {
        match self.start_times.binary_search(&time) {
            Ok(_) => false,
            Err(at) => {
                self.start_times.insert(at, time);
                true
            }
        }
    }
}

/// Every start time of `route` for one day, sorted and de-duplicated.
pub fn start_times_for(route: &Route) -> ScheduleResult<Vec<Time>> {
    if route.frequency == Duration::ZERO {
        return Err(ScheduleError::ZeroFrequency(route.id));
    }
    let span = route.last_train.since(route.first_train).secs();
    let step = route.frequency.secs() as usize;
    let mut times: Vec<Time> = (0..=span)
        .step_by(step)
        .map(|offset| route.first_train + Duration::from_secs(offset))
        .collect();
    times.sort_unstable();
    times.dedup();
    Ok(times)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimetableRepository {
    timetables: Repository<Timetable>,
}

impl TimetableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `route` an empty timetable.  Returns `false` if it already has
    /// one.
    pub fn add_timetable(&mut self, route: RouteId) -> bool {
        if self.timetables.contains(route) {
            return false;
        }
        self.timetables.insert(Timetable::new(route));
        true
    }

    /// Replace the start times of `route`, creating its timetable if
    /// missing.  `start_times` must already be sorted and duplicate-free.
    fn set_start_times(&mut self, route: RouteId, start_times: Vec<Time>) {
        match self.timetables.get_mut(route) {
            Some(timetable) => timetable.start_times = start_times,
            None => {
                self.timetables.insert(Timetable { route, start_times });
            }
        }
    }

    /// Empty the timetable of `route`, keeping the timetable itself.
    pub fn clear_start_times(&mut self, route: RouteId) {
        if let Some(timetable) = self.timetables.get_mut(route) {
            timetable.start_times.clear();
        }
    }

    pub fn remove(&mut self, route: RouteId) -> Option<Timetable> {
        self.timetables.remove(route)
    }

    pub fn get(&self, route: RouteId) -> Option<&Timetable> {
        self.timetables.get(route)
    }

    pub fn start_times(&self, route: RouteId) -> &[Time] {
        self.timetables.get(route).map_or(&[], |t| t.start_times.as_slice())
    }

    pub fn all(&self) -> impl Iterator<Item = &Timetable> + '_ {
        self.timetables.all()
    }

    pub fn len(&self) -> usize {
        self.timetables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timetables.is_empty()
    }

    // ── Generation ────────────────────────────────────────────────────────

    /// Recompute every timetable's start times from its route.  Routes with
    /// fewer than two stops cannot run and get an empty timetable.
    pub fn calculate_start_times(&mut self, routes: &Repository<Route>) -> ScheduleResult<()> {
        let mut computed = Vec::with_capacity(self.timetables.len());
        for timetable in self.timetables.all() {
            let route = routes
                .get(timetable.route)
                .ok_or(ScheduleError::RouteNotFound(timetable.route))?;
            let times = if route.stops.len() < 2 {
                warn!("{} has {} stops; its timetable stays empty", route.id, route.stops.len());
                Vec::new()
            } else {
                start_times_for(route)?
            };
            computed.push((route.id, times));
        }
        for (route, times) in computed {
            debug!("{route}: {} start times", times.len());
            self.set_start_times(route, times);
        }
        Ok(())
    }

    /// Put a start time back into `route`'s timetable, sorted.  Returns
    /// `false` if it was already listed.
    pub fn return_start_time(&mut self, route: RouteId, time: Time) -> ScheduleResult<bool> {
        let timetable = self.timetables.get_mut(route).ok_or(ScheduleError::RouteNotFound(route))?;
        Ok(timetable.insert(time))
    }

    /// Remove and return the earliest start time of `route` that fell due
    /// within the last `window` up to and including `now`.
    pub fn take_due_start_time(&mut self, route: RouteId, now: Time, window: Duration) -> Option<Time> {
        let timetable = self.timetables.get_mut(route)?;
        let at = timetable
            .start_times
            .iter()
            .enumerate()
            .filter(|(_, t)| now.since(**t) <= window)
            .max_by_key(|(_, t)| now.since(**t))
            .map(|(i, _)| i)?;
        Some(timetable.start_times.remove(at))
    }

    /// One schedule per start time of `route`, stored in `schedules` under
    /// fresh ids.
    pub fn generate_schedules(
        &self,
        route: &Route,
        schedules: &mut Repository<Schedule>,
    ) -> ScheduleResult<Vec<ScheduleId>> {
        let timetable = self.timetables.get(route.id).ok_or(ScheduleError::RouteNotFound(route.id))?;
        let mut ids = Vec::with_capacity(timetable.start_times.len());
        for &start in &timetable.start_times {
            let schedule = Schedule::from_route(schedules.next_id(), route, start)?;
            ids.push(schedules.add(schedule)?);
        }
        info!("{}: generated {} schedules", route.id, ids.len());
        Ok(ids)
    }

    // ── Archive ───────────────────────────────────────────────────────────

    pub fn to_archive(&self) -> Vec<Timetable> {
        self.timetables.to_archive()
    }

    /// Rebuild from an archive, restoring the sorted, duplicate-free order.
    pub fn from_archive(timetables: Vec<Timetable>) -> ScheduleResult<Self> {
        let timetables = timetables
            .into_iter()
            .map(|mut t| {
                t.start_times.sort_unstable();
                t.start_times.dedup();
                t
            })
            .collect();
        Ok(Self { timetables: Repository::from_archive(timetables)? })
    }
}
