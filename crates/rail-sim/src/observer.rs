//! Simulation observer trait for playback reporting and rendering.

use rail_core::{RouteId, ScheduleId, SimClock, StationId, Time, TrainId};

use crate::World;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: departure board
///
/// ```rust,ignore
/// struct Board;
///
/// impl SimObserver for Board {
///     fn on_departure(&mut self, clock: &SimClock, train: TrainId, station: StationId) {
///         println!("{clock}: {train} departs {station}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each step, after the clock has advanced.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// Called at the end of each step with read-only access to the whole
    /// world, so a renderer can draw occupancy without the sim knowing
    /// about it.
    fn on_tick_end(&mut self, _clock: &SimClock, _world: &World) {}

    /// A due start time of `route` was handed to `train`.
    fn on_dispatch(&mut self, _clock: &SimClock, _train: TrainId, _route: RouteId, _schedule: ScheduleId) {}

    /// A start time fell due but no idle train stood at the route's origin.
    fn on_missed_start(&mut self, _clock: &SimClock, _route: RouteId, _start: Time) {}

    fn on_arrival(&mut self, _clock: &SimClock, _train: TrainId, _station: StationId) {}

    fn on_departure(&mut self, _clock: &SimClock, _train: TrainId, _station: StationId) {}

    /// `train` reached the last stop of `schedule`.
    fn on_schedule_complete(&mut self, _clock: &SimClock, _train: TrainId, _schedule: ScheduleId) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
