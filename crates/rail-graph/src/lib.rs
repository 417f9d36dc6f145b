//! `rail-graph`: track topology, signals and track-construction search.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`edge`]       | `Edge` (orientation-agnostic identity), `EdgeData`         |
//! | [`graph`]      | `NetworkGraph`, node attributes, signals, `GraphArchive`   |
//! | [`pathfinder`] | `Pathfinder` trait, `AStarPathfinder`, `FootprintIndex`    |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod edge;
pub mod error;
pub mod graph;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use edge::{Edge, EdgeData};
pub use error::{GraphError, GraphResult};
pub use graph::{linkable, AttrValue, EdgeRecord, GraphArchive, NetworkGraph, NodeAttrRecord, SIGNAL_ATTR};
pub use pathfinder::{AStarPathfinder, Cost, FootprintIndex, NoFootprints, Pathfinder, SearchContext};
