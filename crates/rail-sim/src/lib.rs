//! `rail-sim`: the world aggregate, persistence and the tick loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`world`]    | `World`: graph + every repository, construction operations |
//! | [`document`] | `NetworkDocument`, JSON save/load, reference validation    |
//! | [`sim`]      | `Sim`, `TrainPhase`: clock, dispatch, platform stops       |
//! | [`observer`] | `SimObserver`, `NoopObserver`                              |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Tick loop
//!
//! ```text
//! tick (mode.multiplier() steps of tick_secs):
//!   ① Clock    : advance; refresh timetables on a new day
//!   ② Dispatch : due start times → schedules on idle trains at the origin
//!   ③ Trains   : dwell until departure, drive, brake for the next platform
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rail_core::SimConfig;
//! use rail_sim::{NoopObserver, Sim, World};
//!
//! let config = SimConfig::default();
//! let mut world = World::from_config(&config);
//! world.lay_track(&nodes, None)?;
//! let mut sim = Sim::new(config, world)?;
//! sim.tick(&mut NoopObserver)?;
//! ```

pub mod document;
pub mod error;
pub mod observer;
pub mod sim;
pub mod world;


pub use document::NetworkDocument;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TrainPhase};
pub use world::World;
