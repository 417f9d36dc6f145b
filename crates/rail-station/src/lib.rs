//! `rail-station`: stations, platforms and the footprint index.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`station`]    | `Station`, `Platform`                                     |
//! | [`repository`] | `StationRepository` (R-tree footprints, platform index)   |
//! | [`error`]      | `StationError`, `StationResult<T>`                        |
//!
//! `StationRepository` implements [`rail_graph::FootprintIndex`], so it can
//! be handed straight to the pathfinder as its obstacle set.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Station`/`Platform`.  |

pub mod error;
pub mod repository;
pub mod station;

#[cfg(test)]
mod tests;

pub use error::{StationError, StationResult};
pub use repository::StationRepository;
pub use station::{Platform, Station};
