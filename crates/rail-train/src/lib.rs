//! `rail-train`: trains as runs of track, occupancy, placement and motion.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`train`]      | `Train`, `TrainConfig`, `Motion`: position model + kinematics  |
//! | [`repository`] | `TrainRepository` (occupancy index), `Preview`, `Placement`    |
//! | [`walk`]       | Turn-valid continuation of a segment, segment lookups          |
//! | [`error`]      | `TrainError`, `TrainResult<T>`                                 |
//!
//! # Units
//!
//! Lengths are metres, speed limits and `max_speed` are km/h (the unit of
//! `EdgeData::speed`), and a train's current speed is m/s.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Train`/`TrainConfig`. |

pub mod error;
pub mod repository;
pub mod train;
pub mod walk;


pub use error::{TrainError, TrainResult};
pub use repository::{Placement, Preview, TrainRepository};
pub use train::{Motion, Train, TrainConfig, KMH_PER_MPS, STOP_TOLERANCE};
