//! Grid geometry: `Node`, `Direction`, `Pose`.
//!
//! # Grid model
//!
//! Track lives on an integer grid.  Every grid point exists once per
//! *level*: level 0 is the surface, level 1 the tunnel layer.  A tunnel node
//! and the surface node above it share `(x, y)` but are different nodes.
//!
//! Track may only leave a grid point in one of eight compass directions, and
//! may only bend by 45° at a time.  The bend restriction lives in
//! [`Direction::valid_turns`]:
//!
//! ```text
//!   arriving E  ──►  may continue NE, E or SE
//!   arriving NE ──►  may continue N, NE or E
//!   start (NONE) ─►  may leave in any of the 8 directions
//! ```
//!
//! `y` grows downwards (screen convention), so `N` is `(0, -1)`.

use std::fmt;

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the eight unit steps on the grid, or the null start direction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    /// Null direction: "no heading yet".  Only valid for search starts and
    /// target poses that accept any approach.
    pub const NONE: Direction = Direction { dx: 0, dy: 0 };

    pub const N:  Direction = Direction { dx: 0,  dy: -1 };
    pub const NE: Direction = Direction { dx: 1,  dy: -1 };
    pub const E:  Direction = Direction { dx: 1,  dy: 0 };
    pub const SE: Direction = Direction { dx: 1,  dy: 1 };
    pub const S:  Direction = Direction { dx: 0,  dy: 1 };
    pub const SW: Direction = Direction { dx: -1, dy: 1 };
    pub const W:  Direction = Direction { dx: -1, dy: 0 };
    pub const NW: Direction = Direction { dx: -1, dy: -1 };

    /// All eight headings in clockwise compass order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Build a direction from a raw step.  Returns `None` unless both
    /// components are in `-1..=1`.  `(0, 0)` yields [`Direction::NONE`].
    pub fn new(dx: i32, dy: i32) -> Option<Direction> {
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            return None;
        }
        Some(Direction { dx: dx as i8, dy: dy as i8 })
    }

    /// Direction of the single grid step from `from` to `to`, ignoring level.
    ///
    /// Returns `None` if the two nodes are more than one step apart.
    pub fn between(from: Node, to: Node) -> Option<Direction> {
        Direction::new(to.x - from.x, to.y - from.y)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Direction::NONE
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// Movement cost of one step: 1 along an axis, √2 on a diagonal.
    #[inline]
    pub fn cost(self) -> f64 {
        match (self.dx, self.dy) {
            (0, 0) => 0.0,
            (0, _) | (_, 0) => 1.0,
            _ => std::f64::consts::SQRT_2,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Direction { dx: -self.dx, dy: -self.dy }
    }

    /// Position of this heading in [`Direction::ALL`]; `None` for `NONE`.
    pub fn compass_index(self) -> Option<usize> {
        Direction::ALL.iter().position(|&d| d == self)
    }

    /// Directions a path may continue into after arriving along `self`:
    /// the 45° left turn, straight on, and the 45° right turn.  The null
    /// direction may continue anywhere.
    pub fn valid_turns(self) -> &'static [Direction] {
        match self.compass_index() {
            Some(i) => &VALID_TURNS[i],
            None => &Direction::ALL,
        }
    }

    /// `true` if a step along `next` is allowed after arriving along `self`.
    #[inline]
    pub fn allows_turn_to(self, next: Direction) -> bool {
        !next.is_none() && self.valid_turns().contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match (self.dx, self.dy) {
            (0, -1)  => "N",
            (1, -1)  => "NE",
            (1, 0)   => "E",
            (1, 1)   => "SE",
            (0, 1)   => "S",
            (-1, 1)  => "SW",
            (-1, 0)  => "W",
            (-1, -1) => "NW",
            _        => "none",
        }
    }
}

const VALID_TURNS: [[Direction; 3]; 8] = [
    [Direction::NW, Direction::N,  Direction::NE],
    [Direction::N,  Direction::NE, Direction::E],
    [Direction::NE, Direction::E,  Direction::SE],
    [Direction::E,  Direction::SE, Direction::S],
    [Direction::SE, Direction::S,  Direction::SW],
    [Direction::S,  Direction::SW, Direction::W],
    [Direction::SW, Direction::W,  Direction::NW],
    [Direction::W,  Direction::NW, Direction::N],
];

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A grid point on one level.
///
/// Ordering is lexicographic over `(x, y, level)`; two nodes are the same
/// place only if all three fields match.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub x: i32,
    pub y: i32,
    pub level: i8,
}

impl Node {
    pub const SURFACE: i8 = 0;
    pub const TUNNEL: i8 = 1;

    #[inline]
    pub const fn new(x: i32, y: i32, level: i8) -> Self {
        Self { x, y, level }
    }

    /// A node on the surface level.
    #[inline]
    pub const fn surface(x: i32, y: i32) -> Self {
        Self::new(x, y, Self::SURFACE)
    }

    /// A node on the tunnel level.
    #[inline]
    pub const fn tunnel(x: i32, y: i32) -> Self {
        Self::new(x, y, Self::TUNNEL)
    }

    /// The neighbouring node one step along `dir` on the same level.
    #[inline]
    pub fn offset(self, dir: Direction) -> Node {
        Node::new(self.x + dir.dx as i32, self.y + dir.dy as i32, self.level)
    }

    /// Chebyshev (king-move) distance in the x/y plane, ignoring level.
    #[inline]
    pub fn chebyshev(self, other: Node) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Same `(x, y)` and level.
    #[inline]
    pub fn same_level(self, other: Node) -> bool {
        self.level == other.level
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, L{})", self.x, self.y, self.level)
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// A node paired with the heading used to approach or leave it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub node: Node,
    pub direction: Direction,
}

impl Pose {
    #[inline]
    pub const fn new(node: Node, direction: Direction) -> Self {
        Self { node, direction }
    }

    /// A pose with no heading (search start that may leave in any direction).
    #[inline]
    pub const fn at(node: Node) -> Self {
        Self { node, direction: Direction::NONE }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.node, self.direction)
    }
}
