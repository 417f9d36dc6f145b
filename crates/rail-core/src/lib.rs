//! `rail-core`: foundational types for the railway network model.
//!
//! This crate is a dependency of every other `rail-*` crate.  It has no
//! `rail-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geometry`]    | `Node`, `Direction`, `Pose`, turn-validity tables     |
//! | [`ids`]         | `StationId`, `TrainId`, `RouteId`, `ScheduleId`       |
//! | [`time`]        | `Time`, `Duration`, `SimClock`                        |
//! | [`config`]      | `NetworkConfig`, `PathfinderConfig`, `SimConfig`, `TimeControlMode` |
//! | [`repository`]  | `Repository<T>`, `Entity`                             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod repository;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{NetworkConfig, PathfinderConfig, SimConfig, TimeControlMode};
pub use error::{CoreError, CoreResult};
pub use geometry::{Direction, Node, Pose};
pub use ids::{RouteId, ScheduleId, SequentialId, StationId, TrainId};
pub use repository::{Entity, Repository};
pub use time::{Duration, SimClock, Time, SECS_PER_DAY};
