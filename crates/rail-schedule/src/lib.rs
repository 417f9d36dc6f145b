//! `rail-schedule`: routes, schedules, timetables and CSV route loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`route`]     | `Route`, `RouteStop`: relative-time service templates     |
//! | [`schedule`]  | `Schedule`, `ScheduleStop`: a route at a start time       |
//! | [`timetable`] | `Timetable`, `TimetableRepository`, `start_times_for`     |
//! | [`cascade`]   | `remove_station_from_all_stops`, `StopRemoval`            |
//! | [`loader`]    | `load_routes_csv`, `load_routes_reader`                   |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Projection model (summary)
//!
//! ```text
//! Route      stops + travel/dwell times, headway, first/last train
//!   │  timetable: first_train ..= last_train step frequency
//!   ▼
//! start times (sorted, one day)
//!   │  Schedule::from_route(route, start)
//!   ▼
//! Schedule   (station, arrival, departure) per stop + playback pointer
//! ```
//!
//! Routes and schedules are stored in `rail_core::Repository`s; the aliases
//! [`RouteRepository`] and [`ScheduleRepository`] name them.

pub mod cascade;
pub mod error;
pub mod loader;
pub mod route;
pub mod schedule;
pub mod timetable;


pub use cascade::{remove_station_from_all_stops, StopRemoval};
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_routes_csv, load_routes_reader};
pub use route::{Route, RouteStop};
pub use schedule::{Schedule, ScheduleStop};
pub use timetable::{start_times_for, Timetable, TimetableRepository};

pub type RouteRepository = rail_core::Repository<Route>;
pub type ScheduleRepository = rail_core::Repository<Schedule>;
