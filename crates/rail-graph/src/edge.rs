//! `Edge`: one physical track segment, viewed in a direction of travel.
//!
//! An `Edge` remembers the orientation it was created with (`start → end`),
//! which is what a train run or a path walk needs.  Equality, ordering and
//! hashing, however, only look at the *canonical* (sorted) endpoint pair, so
//! the same physical segment is always the same key no matter which way it
//! is traversed:
//!
//! ```
//! use rail_core::Node;
//! use rail_graph::Edge;
//!
//! let a = Node::surface(0, 0);
//! let b = Node::surface(1, 0);
//! assert_eq!(Edge::new(a, b), Edge::new(b, a));
//! assert_eq!(Edge::new(a, b).reversed().start, b);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rail_core::{Direction, Node};

/// An undirected track segment with a traversal view.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub start: Node,
    pub end: Node,
}

impl Edge {
    #[inline]
    pub const fn new(start: Node, end: Node) -> Self {
        Self { start, end }
    }

    /// The endpoint pair in sorted order.  Identity of the physical segment.
    #[inline]
    pub fn key(&self) -> (Node, Node) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// The same segment viewed in storage orientation (`start <= end`).
    #[inline]
    pub fn canonical(self) -> Edge {
        let (start, end) = self.key();
        Edge { start, end }
    }

    /// The same segment viewed in the opposite direction of travel.
    #[inline]
    pub fn reversed(self) -> Edge {
        Edge { start: self.end, end: self.start }
    }

    /// Step direction of this view in the x/y plane.  `Direction::NONE` for
    /// a vertical level-change link.
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::between(self.start, self.end).unwrap_or(Direction::NONE)
    }

    /// `true` if the two endpoints are on different levels.
    #[inline]
    pub fn is_level_change(&self) -> bool {
        self.start.level != self.end.level
    }

    #[inline]
    pub fn contains(&self, node: Node) -> bool {
        self.start == node || self.end == node
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other(&self, node: Node) -> Option<Node> {
        if self.start == node {
            Some(self.end)
        } else if self.end == node {
            Some(self.start)
        } else {
            None
        }
    }

    /// The shared endpoint of two segments, if any.
    pub fn shared_node(&self, other: &Edge) -> Option<Node> {
        if other.contains(self.start) {
            Some(self.start)
        } else if other.contains(self.end) {
            Some(self.end)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Attributes of one track segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeData {
    /// Speed limit.
    pub speed: u32,
    /// Physical length in metres.
    pub length: u32,
}

impl EdgeData {
    pub const fn new(speed: u32, length: u32) -> Self {
        Self { speed, length }
    }
}
