//! Track-construction pathfinder: pathfinding trait and default A*.
//!
//! # Pluggability
//!
//! The construction layer calls the search through the [`Pathfinder`]
//! trait, so an editor can swap in a different strategy without touching
//! the graph.  The default [`AStarPathfinder`] searches the free grid around
//! the existing network for a new stretch of track.
//!
//! # Search model
//!
//! A search state is `(node, arrival direction)`.  From a state reached
//! along `d`, only the steps in [`Direction::valid_turns`] are generated,
//! so every proposed path can actually be built in the editor (no kinks
//! sharper than 45°).  The start pose's direction seeds the first state;
//! `Direction::NONE` may leave in any of the eight directions.
//!
//! Cells inside a station footprint (other than the start and the target)
//! and cells holding a signal whose facing is not along the step are
//! obstacles.  The search stays on the start's level and inside the
//! start/target bounding box grown by `search_margin` cells.
//!
//! # Costs and determinism
//!
//! A path of `a` axis steps and `b` diagonal steps costs `a + b·√2`.
//! [`Cost`] keeps the two counts as integers and compares them exactly, so
//! equal-cost frontier entries really compare equal and are then served in
//! insertion order.  The same graph and poses therefore always produce the
//! same path, not merely a path of the same cost.
//!
//! The heuristic is the Chebyshev distance to the target.  Every step moves
//! the Chebyshev distance by at most 1 and costs at least 1, so it is
//! admissible and consistent, and the first goal state popped is optimal.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::debug;

use rail_core::{Direction, Node, PathfinderConfig, Pose};

use crate::{GraphError, GraphResult, NetworkGraph};

// ── FootprintIndex ────────────────────────────────────────────────────────────

/// Answers "is this cell covered by a station?" for obstacle checks.
///
/// Implemented by the station repository; [`NoFootprints`] is the empty
/// index.
pub trait FootprintIndex {
    fn is_within_any(&self, node: Node) -> bool;
}

/// A [`FootprintIndex`] with no stations.
pub struct NoFootprints;

impl FootprintIndex for NoFootprints {
    fn is_within_any(&self, _node: Node) -> bool {
        false
    }
}

impl<F: FootprintIndex + ?Sized> FootprintIndex for &F {
    fn is_within_any(&self, node: Node) -> bool {
        (**self).is_within_any(node)
    }
}

// ── Cost ──────────────────────────────────────────────────────────────────────

/// Exact path cost `axis + diagonal·√2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cost {
    pub axis: u32,
    pub diagonal: u32,
}

impl Cost {
    pub const ZERO: Cost = Cost { axis: 0, diagonal: 0 };

    /// Cost of a single step along `dir`.
    pub fn of_step(dir: Direction) -> Cost {
        match (dir.is_none(), dir.is_diagonal()) {
            (true, _) => Cost::ZERO,
            (false, true) => Cost { axis: 0, diagonal: 1 },
            (false, false) => Cost { axis: 1, diagonal: 0 },
        }
    }

    /// Total cost of walking `nodes` in order.
    pub fn of_path(nodes: &[Node]) -> Cost {
        nodes
            .windows(2)
            .filter_map(|w| Direction::between(w[0], w[1]))
            .fold(Cost::ZERO, |acc, d| acc.plus(Cost::of_step(d)))
    }

    #[inline]
    pub fn plus(self, other: Cost) -> Cost {
        Cost {
            axis: self.axis + other.axis,
            diagonal: self.diagonal + other.diagonal,
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.axis as f64 + self.diagonal as f64 * std::f64::consts::SQRT_2
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        // sign of (x - y·√2) with x = Δaxis, y = -Δdiagonal
        let x = self.axis as i64 - other.axis as i64;
        let y = other.diagonal as i64 - self.diagonal as i64;
        match (x.signum(), y.signum()) {
            (0, 0) => Ordering::Equal,
            (sx, sy) if sx >= 0 && sy <= 0 => Ordering::Greater,
            (sx, sy) if sx <= 0 && sy >= 0 => Ordering::Less,
            // Same sign: compare x² with 2y², flipping when both negative.
            (sx, _) => {
                let lhs = (x * x).cmp(&(2 * y * y));
                if sx > 0 { lhs } else { lhs.reverse() }
            }
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable track-construction search.
///
/// Implementations must be `Send + Sync` so a stale search can run on a
/// worker and simply be discarded; a search never mutates the graph.
pub trait Pathfinder: Send + Sync {
    /// Find a buildable path from `start` to `target`.
    ///
    /// Returns `Ok(None)` when no path exists; that is an expected outcome,
    /// not an error.  Returns [`GraphError::InvalidArgument`] when `start`
    /// or `target` is absent from the graph or they are on different levels.
    fn find_path(
        &self,
        graph: &NetworkGraph,
        footprints: &dyn FootprintIndex,
        start: Pose,
        target: Pose,
    ) -> GraphResult<Option<Vec<Node>>>;
}

// ── SearchContext ─────────────────────────────────────────────────────────────

/// Everything a single search reads: the graph snapshot, the obstacles, the
/// endpoints and the search box.
pub struct SearchContext<'a> {
    pub graph: &'a NetworkGraph,
    pub footprints: &'a dyn FootprintIndex,
    pub start: Pose,
    pub target: Pose,
    min: (i32, i32),
    max: (i32, i32),
}

impl<'a> SearchContext<'a> {
    pub fn new(
        graph: &'a NetworkGraph,
        footprints: &'a dyn FootprintIndex,
        start: Pose,
        target: Pose,
        config: &PathfinderConfig,
    ) -> Self {
        let margin = config.search_margin.min(i32::MAX as u32) as i32;
        let (s, t) = (start.node, target.node);
        Self {
            graph,
            footprints,
            start,
            target,
            min: (s.x.min(t.x).saturating_sub(margin), s.y.min(t.y).saturating_sub(margin)),
            max: (s.x.max(t.x).saturating_add(margin), s.y.max(t.y).saturating_add(margin)),
        }
    }

    /// `true` if a step along `step` may enter `node`.
    pub fn can_enter(&self, node: Node, step: Direction) -> bool {
        if node.level != self.start.node.level
            || node.x < self.min.0
            || node.x > self.max.0
            || node.y < self.min.1
            || node.y > self.max.1
        {
            return false;
        }
        let endpoint = node == self.start.node || node == self.target.node;
        if !endpoint && self.footprints.is_within_any(node) {
            return false;
        }
        self.graph
            .signals_at(node)
            .all(|facing| facing == step || facing == step.opposite())
    }

    /// States reachable in one step from `node` when it was reached along
    /// `arrived`.  Only headings in `arrived.valid_turns()` are generated.
    pub fn successors(&self, node: Node, arrived: Direction) -> impl Iterator<Item = (Node, Direction)> + '_ {
        arrived
            .valid_turns()
            .iter()
            .map(move |&step| (node.offset(step), step))
            .filter(move |&(next, step)| self.can_enter(next, step))
    }

    /// `true` if the state `(node, arrived)` completes the search.
    pub fn is_goal(&self, node: Node, arrived: Direction) -> bool {
        node == self.target.node
            && (self.target.direction.is_none() || arrived.allows_turn_to(self.target.direction))
    }

    /// Chebyshev distance to the target.
    #[inline]
    pub fn heuristic(&self, node: Node) -> u32 {
        node.chebyshev(self.target.node)
    }
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

/// A* over `(node, arrival direction)` states on the free grid.
#[derive(Clone, Debug, Default)]
pub struct AStarPathfinder {
    pub config: PathfinderConfig,
}

impl AStarPathfinder {
    pub fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path(
        &self,
        graph: &NetworkGraph,
        footprints: &dyn FootprintIndex,
        start: Pose,
        target: Pose,
    ) -> GraphResult<Option<Vec<Node>>> {
        for (what, pose) in [("start", start), ("target", target)] {
            if !graph.has_node(pose.node) {
                return Err(GraphError::InvalidArgument(format!(
                    "{what} node {} is not in the graph",
                    pose.node
                )));
            }
        }
        if start.node.level != target.node.level {
            return Err(GraphError::InvalidArgument(format!(
                "start {} and target {} are on different levels",
                start.node, target.node
            )));
        }
        if start.node == target.node {
            return Ok(Some(vec![start.node]));
        }

        let ctx = SearchContext::new(graph, footprints, start, target, &self.config);
        let path = astar(&ctx, self.config.max_expansions);
        match &path {
            Some(nodes) => debug!(
                "path {} -> {}: {} steps, cost {:.3}",
                start,
                target,
                nodes.len() - 1,
                Cost::of_path(nodes).as_f64()
            ),
            None => debug!("no path {start} -> {target}"),
        }
        Ok(path)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

type State = (Node, Direction);

/// Frontier entry.  `BinaryHeap` is a max-heap, so `Ord` is reversed: the
/// smallest `f` wins, then the smallest insertion sequence.
struct Open {
    f: Cost,
    seq: u64,
    g: Cost,
    state: State,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn astar(ctx: &SearchContext<'_>, max_expansions: usize) -> Option<Vec<Node>> {
    let start: State = (ctx.start.node, ctx.start.direction);

    let mut best_g: HashMap<State, Cost> = HashMap::new();
    let mut came_from: HashMap<State, State> = HashMap::new();
    let mut closed: HashSet<State> = HashSet::new();
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;

    best_g.insert(start, Cost::ZERO);
    open.push(Open {
        f: Cost { axis: ctx.heuristic(start.0), diagonal: 0 },
        seq,
        g: Cost::ZERO,
        state: start,
    });

    while let Some(Open { g, state, .. }) = open.pop() {
        if !closed.insert(state) {
            continue;
        }
        let (node, arrived) = state;
        if state != start && ctx.is_goal(node, arrived) {
            return Some(reconstruct(&came_from, state));
        }
        if closed.len() > max_expansions {
            debug!("search gave up after {max_expansions} expansions");
            return None;
        }

        for (next, step) in ctx.successors(node, arrived) {
            let next_state = (next, step);
            if closed.contains(&next_state) {
                continue;
            }
            let next_g = g.plus(Cost::of_step(step));
            let improved = match best_g.entry(next_state) {
                Entry::Occupied(mut e) if next_g < *e.get() => {
                    e.insert(next_g);
                    true
                }
                Entry::Occupied(_) => false,
                Entry::Vacant(e) => {
                    e.insert(next_g);
                    true
                }
            };
            if improved {
                came_from.insert(next_state, state);
                seq += 1;
                open.push(Open {
                    f: next_g.plus(Cost { axis: ctx.heuristic(next), diagonal: 0 }),
                    seq,
                    g: next_g,
                    state: next_state,
                });
            }
        }
    }
    None
}

fn reconstruct(came_from: &HashMap<State, State>, goal: State) -> Vec<Node> {
    let mut nodes = vec![goal.0];
    let mut cur = goal;
    while let Some(&prev) = came_from.get(&cur) {
        nodes.push(prev.0);
        cur = prev;
    }
    nodes.reverse();
    nodes
}
