//! `Station` and `Platform` value types.

use std::collections::BTreeSet;
use std::fmt;

use rail_core::{Entity, Node, StationId};
use rail_graph::Edge;

// ── Platform ──────────────────────────────────────────────────────────────────

/// A set of track segments where trains of one station stop.
///
/// Edges are stored in canonical orientation, so two platforms built from
/// the same segments traversed in different directions are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Platform {
    edges: BTreeSet<Edge>,
}

impl Platform {
    pub fn new(edges: impl IntoIterator<Item = Edge>) -> Self {
        Self { edges: edges.into_iter().map(Edge::canonical).collect() }
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `true` if the two platforms share at least one segment.
    pub fn intersects(&self, other: &Platform) -> bool {
        self.edges.iter().any(|e| other.edges.contains(e))
    }
}

impl FromIterator<Edge> for Platform {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Platform::new(iter)
    }
}

// ── Station ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Centre of the footprint.
    pub anchor: Node,
    pub platforms: Vec<Platform>,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, anchor: Node) -> Self {
        Self { id, name: name.into(), anchor, platforms: Vec::new() }
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms.extend(platforms);
        self
    }

    /// Every platform segment of this station.
    pub fn platform_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.platforms.iter().flat_map(Platform::edges)
    }

    /// The platform containing `edge`, if any.
    pub fn platform_with(&self, edge: &Edge) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.contains(edge))
    }

    /// A segment shared by two of this station's own platforms, if any.
    pub(crate) fn first_internal_conflict(&self) -> Option<Edge> {
        for (i, a) in self.platforms.iter().enumerate() {
            for b in &self.platforms[i + 1..] {
                if let Some(e) = a.edges().find(|e| b.contains(e)) {
                    return Some(e);
                }
            }
        }
        None
    }
}

impl Entity for Station {
    type Id = StationId;

    fn id(&self) -> StationId {
        self.id
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.id, self.name, self.anchor)
    }
}
