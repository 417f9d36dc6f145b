//! The track graph.
//!
//! # Data layout
//!
//! Adjacency is an ordered map `Node → (Node → EdgeData)`, with every
//! segment stored under both endpoints.  Ordered maps make every iterator
//! deterministic, which the pathfinder and the persistence round-trip rely
//! on.
//!
//! A node exists exactly while at least one segment touches it.  Removing
//! the last segment at a node drops the node and its attributes.
//!
//! Per-node attributes live in a separate typed key-value store so that
//! signals (and anything else the editor wants to pin to a grid point) do
//! not leak into the `Node` value type.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use rail_core::{Direction, Node, Pose};

use crate::{Edge, EdgeData, GraphError, GraphResult};

/// Attribute key under which a node's signals are stored.
pub const SIGNAL_ATTR: &str = "signals";

// ── AttrValue ─────────────────────────────────────────────────────────────────

/// A value in the per-node attribute store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttrValue {
    /// Facing directions of the signals at a node.
    Signals(BTreeSet<Direction>),
    Flag(bool),
    Int(i64),
    Text(String),
}

// ── Archive records ───────────────────────────────────────────────────────────

/// One segment in a [`GraphArchive`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub edge: Edge,
    pub speed: u32,
    pub length: u32,
}

/// One attribute in a [`GraphArchive`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeAttrRecord {
    pub node: Node,
    pub key: String,
    pub value: AttrValue,
}

/// Serializable form of a [`NetworkGraph`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphArchive {
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeRecord>,
    pub node_attrs: Vec<NodeAttrRecord>,
}

// ── NetworkGraph ──────────────────────────────────────────────────────────────

/// Multi-level undirected track graph with per-node attributes.
///
/// The graph is the single owner of nodes, segments and signals.  All
/// queries take `&self`; all mutations take `&mut self` and leave the graph
/// unchanged when they fail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkGraph {
    adjacency: BTreeMap<Node, BTreeMap<Node, EdgeData>>,
    node_attrs: BTreeMap<Node, BTreeMap<String, AttrValue>>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert the segment `a – b`.
    ///
    /// Fails with an invalid-topology error if `a == b`, if the endpoints are
    /// not linkable (see [`linkable`]), if either attribute is zero, or if
    /// the segment already exists with different attributes.  Re-inserting
    /// an identical segment is a no-op.
    pub fn add_edge(&mut self, a: Node, b: Node, speed: u32, length: u32) -> GraphResult<Edge> {
        let data = EdgeData::new(speed, length);
        let edge = self.check_new_edge(a, b, data)?;
        self.insert_unchecked(a, b, data);
        Ok(edge)
    }

    /// Lay a path of nodes (as returned by the pathfinder) as track.
    ///
    /// Each new step gets `speed` and a length of `unit_length` times the
    /// step cost (rounded).  Steps that already exist as track are reused
    /// with their current attributes.  The whole path is validated before
    /// anything is inserted.  Returns the path's segments in travel order.
    pub fn add_path(&mut self, nodes: &[Node], speed: u32, unit_length: u32) -> GraphResult<Vec<Edge>> {
        let mut pending = Vec::with_capacity(nodes.len().saturating_sub(1));
        for pair in nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let step = Direction::between(a, b).unwrap_or(Direction::NONE);
            let length = (unit_length as f64 * step.cost().max(1.0)).round() as u32;
            let data = EdgeData::new(speed, length);
            if self.has_edge(&Edge::new(a, b)) {
                pending.push((Edge::new(a, b), None));
            } else {
                pending.push((self.check_new_edge(a, b, data)?, Some(data)));
            }
        }

        let mut edges = Vec::with_capacity(pending.len());
        for (edge, data) in pending {
            if let Some(data) = data {
                self.insert_unchecked(edge.start, edge.end, data);
            }
            edges.push(edge);
        }
        info!("laid {} track segments ({} nodes)", edges.len(), nodes.len());
        Ok(edges)
    }

    /// Remove a segment.  Endpoints left without track are removed together
    /// with their attributes; signals left without supporting track are
    /// dropped.
    pub fn remove_edge(&mut self, edge: &Edge) -> GraphResult<EdgeData> {
        let (a, b) = edge.key();
        let data = self
            .adjacency
            .get_mut(&a)
            .and_then(|nbrs| nbrs.remove(&b))
            .ok_or(GraphError::EdgeNotFound(*edge))?;
        if let Some(nbrs) = self.adjacency.get_mut(&b) {
            nbrs.remove(&a);
        }
        for node in [a, b] {
            if self.adjacency.get(&node).is_some_and(BTreeMap::is_empty) {
                self.adjacency.remove(&node);
                self.node_attrs.remove(&node);
            } else {
                self.prune_signals(node);
            }
        }
        debug!("removed edge {edge}");
        Ok(data)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn has_node(&self, node: Node) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        let (a, b) = edge.key();
        self.adjacency.get(&a).is_some_and(|nbrs| nbrs.contains_key(&b))
    }

    /// Attributes of a segment, in either orientation.
    pub fn edge_data(&self, edge: &Edge) -> Option<&EdgeData> {
        let (a, b) = edge.key();
        self.adjacency.get(&a).and_then(|nbrs| nbrs.get(&b))
    }

    /// Neighbours of `node` in ascending order.
    pub fn neighbors(&self, node: Node) -> GraphResult<Vec<Node>> {
        self.adjacency
            .get(&node)
            .map(|nbrs| nbrs.keys().copied().collect())
            .ok_or(GraphError::NodeNotFound(node))
    }

    /// Number of segments touching `node`.
    pub fn degree_at(&self, node: Node) -> GraphResult<usize> {
        self.adjacency
            .get(&node)
            .map(BTreeMap::len)
            .ok_or(GraphError::NodeNotFound(node))
    }

    /// Segments leaving `node`, oriented away from it.  Empty for unknown
    /// nodes.
    pub fn edges_at(&self, node: Node) -> impl Iterator<Item = (Edge, &EdgeData)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(move |nbrs| nbrs.iter().map(move |(&to, data)| (Edge::new(node, to), data)))
    }

    /// All nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every segment once, in canonical orientation and ascending order.
    pub fn all_edges_with_data(&self) -> impl Iterator<Item = (Edge, &EdgeData)> + '_ {
        self.adjacency.iter().flat_map(|(&a, nbrs)| {
            nbrs.range((std::ops::Bound::Excluded(a), std::ops::Bound::Unbounded))
                .map(move |(&b, data)| (Edge::new(a, b), data))
        })
    }

    /// Every node carrying attribute `key`, with its value.
    pub fn all_nodes_with_attr<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (Node, &'a AttrValue)> + 'a {
        self.node_attrs
            .iter()
            .filter_map(move |(&node, attrs)| attrs.get(key).map(|v| (node, v)))
    }

    // ── Node attributes ───────────────────────────────────────────────────

    /// Set attribute `key` on an existing node, returning the old value.
    ///
    /// [`SIGNAL_ATTR`] is reserved: signals change only through
    /// [`add_signal`](Self::add_signal) and [`remove_signal`](Self::remove_signal).
    pub fn set_node_attr(
        &mut self,
        node: Node,
        key: impl Into<String>,
        value: AttrValue,
    ) -> GraphResult<Option<AttrValue>> {
        let key = key.into();
        reject_reserved(&key)?;
        if !self.has_node(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        Ok(self.node_attrs.entry(node).or_default().insert(key, value))
    }

    pub fn get_node_attr(&self, node: Node, key: &str) -> Option<&AttrValue> {
        self.node_attrs.get(&node).and_then(|attrs| attrs.get(key))
    }

    /// Remove attribute `key` from `node`.  [`SIGNAL_ATTR`] is reserved.
    pub fn remove_node_attr(&mut self, node: Node, key: &str) -> GraphResult<Option<AttrValue>> {
        reject_reserved(key)?;
        Ok(self.take_node_attr(node, key))
    }

    fn take_node_attr(&mut self, node: Node, key: &str) -> Option<AttrValue> {
        let attrs = self.node_attrs.get_mut(&node)?;
        let old = attrs.remove(key);
        if attrs.is_empty() {
            self.node_attrs.remove(&node);
        }
        old
    }

    // ── Signals ───────────────────────────────────────────────────────────

    /// Place a signal at `pose`.
    ///
    /// The node must carry track along the signal's axis (a segment leaving
    /// towards `direction` or arriving from its opposite), and no signal may
    /// already face the same way there.
    pub fn add_signal(&mut self, pose: Pose) -> GraphResult<()> {
        if pose.direction.is_none() {
            return Err(GraphError::InvalidSignal { pose, reason: "signal needs a facing" });
        }
        if !self.has_node(pose.node) {
            return Err(GraphError::NodeNotFound(pose.node));
        }
        if !self.has_track_along(pose.node, pose.direction) {
            warn!("rejected signal at {pose}: no track along its facing");
            return Err(GraphError::InvalidSignal {
                pose,
                reason: "no track through the node in that direction",
            });
        }
        if self.has_signal(pose) {
            return Err(GraphError::DuplicateSignal(pose));
        }

        let attrs = self.node_attrs.entry(pose.node).or_default();
        match attrs
            .entry(SIGNAL_ATTR.to_owned())
            .or_insert_with(|| AttrValue::Signals(BTreeSet::new()))
        {
            AttrValue::Signals(set) => {
                set.insert(pose.direction);
            }
            other => {
                return Err(GraphError::InvalidAttribute(format!(
                    "{SIGNAL_ATTR:?} at {} holds {other:?}",
                    pose.node
                )));
            }
        }
        info!("signal placed at {pose}");
        Ok(())
    }

    /// Remove the signal at `pose`; `false` if there was none.
    pub fn remove_signal(&mut self, pose: Pose) -> bool {
        let removed = match self
            .node_attrs
            .get_mut(&pose.node)
            .and_then(|attrs| attrs.get_mut(SIGNAL_ATTR))
        {
            Some(AttrValue::Signals(set)) => set.remove(&pose.direction),
            _ => false,
        };
        if removed && self.signals_at(pose.node).next().is_none() {
            self.take_node_attr(pose.node, SIGNAL_ATTR);
        }
        removed
    }

    pub fn has_signal(&self, pose: Pose) -> bool {
        self.signals_at(pose.node).any(|d| d == pose.direction)
    }

    /// Facings of the signals at `node`, in compass-sort order.
    pub fn signals_at(&self, node: Node) -> impl Iterator<Item = Direction> + '_ {
        let set = match self.get_node_attr(node, SIGNAL_ATTR) {
            Some(AttrValue::Signals(set)) => Some(set),
            _ => None,
        };
        set.into_iter().flat_map(|s| s.iter().copied())
    }

    /// Every signal in the graph as a pose.
    pub fn signals(&self) -> impl Iterator<Item = Pose> + '_ {
        self.all_nodes_with_attr(SIGNAL_ATTR).flat_map(|(node, value)| {
            let set = match value {
                AttrValue::Signals(set) => Some(set),
                _ => None,
            };
            set.into_iter()
                .flat_map(move |s| s.iter().map(move |&d| Pose::new(node, d)))
        })
    }

    // ── Archive ───────────────────────────────────────────────────────────

    pub fn to_archive(&self) -> GraphArchive {
        GraphArchive {
            nodes: self.nodes().collect(),
            edges: self
                .all_edges_with_data()
                .map(|(edge, data)| EdgeRecord { edge, speed: data.speed, length: data.length })
                .collect(),
            node_attrs: self
                .node_attrs
                .iter()
                .flat_map(|(&node, attrs)| {
                    attrs.iter().map(move |(key, value)| NodeAttrRecord {
                        node,
                        key: key.clone(),
                        value: value.clone(),
                    })
                })
                .collect(),
        }
    }

    /// Rebuild a graph from its archive, re-validating every segment and
    /// signal.
    pub fn from_archive(archive: GraphArchive) -> GraphResult<Self> {
        let mut graph = NetworkGraph::new();
        for rec in archive.edges {
            graph.add_edge(rec.edge.start, rec.edge.end, rec.speed, rec.length)?;
        }

        let listed: BTreeSet<Node> = archive.nodes.into_iter().collect();
        let derived: BTreeSet<Node> = graph.nodes().collect();
        if listed != derived {
            return Err(GraphError::MalformedArchive(format!(
                "node list ({} nodes) does not match the nodes touched by edges ({} nodes)",
                listed.len(),
                derived.len()
            )));
        }

        for rec in archive.node_attrs {
            if rec.key != SIGNAL_ATTR {
                graph.set_node_attr(rec.node, rec.key, rec.value)?;
                continue;
            }
            match rec.value {
                AttrValue::Signals(set) => {
                    for direction in set {
                        graph.add_signal(Pose::new(rec.node, direction))?;
                    }
                }
                other => {
                    return Err(GraphError::MalformedArchive(format!(
                        "{SIGNAL_ATTR:?} at {} holds {other:?}",
                        rec.node
                    )));
                }
            }
        }
        Ok(graph)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn check_new_edge(&self, a: Node, b: Node, data: EdgeData) -> GraphResult<Edge> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        if !linkable(a, b) {
            return Err(GraphError::NotAdjacent { a, b });
        }
        if data.speed == 0 || data.length == 0 {
            return Err(GraphError::InvalidAttribute(format!(
                "edge {a} -> {b} needs non-zero speed and length, got {data:?}"
            )));
        }
        let edge = Edge::new(a, b);
        if let Some(existing) = self.edge_data(&edge) {
            if *existing != data {
                warn!("rejected edge {edge}: exists as {existing:?}, requested {data:?}");
                return Err(GraphError::InconsistentEdge { edge });
            }
        }
        Ok(edge)
    }

    fn insert_unchecked(&mut self, a: Node, b: Node, data: EdgeData) {
        self.adjacency.entry(a).or_default().insert(b, data);
        self.adjacency.entry(b).or_default().insert(a, data);
    }

    /// `true` if a segment at `node` runs along `dir`'s axis on the node's
    /// own level.
    fn has_track_along(&self, node: Node, dir: Direction) -> bool {
        let ahead = node.offset(dir);
        let behind = node.offset(dir.opposite());
        self.adjacency
            .get(&node)
            .is_some_and(|nbrs| nbrs.contains_key(&ahead) || nbrs.contains_key(&behind))
    }

    fn prune_signals(&mut self, node: Node) {
        let stale: Vec<Direction> = self
            .signals_at(node)
            .filter(|&d| !self.has_track_along(node, d))
            .collect();
        for d in stale {
            debug!("dropping signal at {node} facing {d}: track removed");
            self.remove_signal(Pose::new(node, d));
        }
    }
}

/// `true` if `a` and `b` may be joined by one segment: one grid step apart
/// on the same level, or a level-change link between adjacent levels that
/// moves at most one step in the plane.
pub fn linkable(a: Node, b: Node) -> bool {
    if a == b {
        return false;
    }
    let planar = a.chebyshev(b);
    match a.level.abs_diff(b.level) {
        0 => planar == 1,
        1 => planar <= 1,
        _ => false,
    }
}

fn reject_reserved(key: &str) -> GraphResult<()> {
    if key == SIGNAL_ATTR {
        return Err(GraphError::InvalidAttribute(format!(
            "{SIGNAL_ATTR:?} is managed by add_signal/remove_signal"
        )));
    }
    Ok(())
}
