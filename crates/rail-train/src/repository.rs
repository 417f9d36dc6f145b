//! The train repository and its edge-occupancy index.
//!
//! # Occupancy
//!
//! Every segment in a train's run is claimed by that train in one
//! `FxHashMap<Edge, TrainId>`.  `Edge` hashes on its canonical endpoint
//! pair, so a claim holds whichever way the segment is traversed.  No
//! segment is ever claimed twice: every mutation checks the index before
//! touching it and leaves both the trains and the index unchanged when it
//! fails.
//!
//! # Placement
//!
//! [`TrainRepository::calculate_preview`] walks forward from a segment the
//! way a train would drive ([`walk::next_edge`]) until the required length
//! is covered.  Running off the end of track, looping back onto its own
//! walk, or hitting another train's segment makes the preview invalid; the
//! edges walked so far (plus the colliding segment) are returned so the
//! caller can highlight them.  Exactly reaching the required length is
//! enough.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use rail_core::{Node, Repository, ScheduleId, TrainId};
use rail_graph::{Edge, NetworkGraph};

use crate::walk;
use crate::{Motion, Train, TrainConfig, TrainError, TrainResult};

// ── Preview ───────────────────────────────────────────────────────────────────

/// Result of a placement preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub is_valid: bool,
    /// The walked span, in travel order.  For a collision the last entry is
    /// the other train's segment.
    pub edges: Vec<Edge>,
    /// Metres of free track covered by the walk.
    pub covered: u32,
}

/// Outcome of [`TrainRepository::place_train`].
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Placed(TrainId),
    Rejected(Preview),
}

// ── TrainRepository ───────────────────────────────────────────────────────────

/// All trains of the network and the segments they occupy.
#[derive(Clone, Debug, Default)]
pub struct TrainRepository {
    trains: Repository<Train>,
    occupancy: FxHashMap<Edge, TrainId>,
}

/// Equal when the trains are equal; the occupancy index is derived data.
impl PartialEq for TrainRepository {
    fn eq(&self, other: &Self) -> bool {
        self.trains == other.trains
    }
}

impl TrainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Create a train on an unordered set of segments.
    ///
    /// The segments must form one simple path (no branches, no loop, no
    /// gaps), all be track in `graph`, be unclaimed, and be at least as
    /// long as the train.  The run starts at the path end with the lower
    /// node, so the result does not depend on the input order.
    pub fn create_train(
        &mut self,
        graph: &NetworkGraph,
        edges: impl IntoIterator<Item = Edge>,
        config: TrainConfig,
    ) -> TrainResult<TrainId> {
        config.validate()?;
        let set: BTreeSet<Edge> = edges.into_iter().map(Edge::canonical).collect();
        let mut incident: BTreeMap<Node, Vec<Edge>> = BTreeMap::new();
        let mut available = 0u32;
        for edge in &set {
            available = available.saturating_add(walk::edge_length(graph, edge)?);
            self.check_unclaimed(edge)?;
            incident.entry(edge.start).or_default().push(*edge);
            incident.entry(edge.end).or_default().push(*edge);
        }
        if incident.values().any(|at| at.len() > 2) {
            return Err(TrainError::InvalidRun("the edges branch"));
        }

        let start = match incident.iter().find(|(_, at)| at.len() == 1) {
            Some((&node, _)) => node,
            None if set.is_empty() => return Err(TrainError::InvalidRun("no edges given")),
            None => return Err(TrainError::InvalidRun("the edges form a loop")),
        };
        let mut run: Vec<Edge> = Vec::with_capacity(set.len());
        let mut at = start;
        while let Some(next) = incident
            .get(&at)
            .and_then(|es| es.iter().find(|e| run.last() != Some(*e)))
        {
            let other = next.other(at).ok_or(TrainError::InvalidRun("the edges are not connected"))?;
            run.push(Edge::new(at, other));
            at = other;
            if run.len() > set.len() {
                break;
            }
        }
        if run.len() != set.len() {
            return Err(TrainError::InvalidRun("the edges are not connected"));
        }

        let required = config.length();
        if available < required {
            warn!("rejected train: {available} m of track for a {required} m train");
            return Err(TrainError::InsufficientLength { available, required });
        }
        Ok(self.insert_run(run, config))
    }

    /// Walk forward from `start_edge` (in its given orientation) until
    /// `required_length` metres are covered.
    pub fn calculate_preview(
        &self,
        graph: &NetworkGraph,
        start_edge: Edge,
        required_length: u32,
    ) -> TrainResult<Preview> {
        walk::edge_length(graph, &start_edge)?;
        let mut edges: Vec<Edge> = Vec::new();
        let mut covered = 0u32;
        let mut cur = start_edge;
        loop {
            if let Some(&other) = self.occupancy.get(&cur) {
                debug!("preview from {start_edge} collides with {other} at {cur}");
                edges.push(cur);
                return Ok(Preview { is_valid: false, edges, covered });
            }
            covered = covered.saturating_add(walk::edge_length(graph, &cur)?);
            edges.push(cur);
            if covered >= required_length {
                return Ok(Preview { is_valid: true, edges, covered });
            }
            match walk::next_edge(graph, cur) {
                Some(next) if !edges.contains(&next) => cur = next,
                _ => {
                    debug!("preview from {start_edge} ran out of track after {covered} m");
                    return Ok(Preview { is_valid: false, edges, covered });
                }
            }
        }
    }

    /// Preview and, if valid, create a train facing along `start_edge`.
    pub fn place_train(
        &mut self,
        graph: &NetworkGraph,
        start_edge: Edge,
        config: TrainConfig,
    ) -> TrainResult<Placement> {
        config.validate()?;
        let preview = self.calculate_preview(graph, start_edge, config.length())?;
        if !preview.is_valid {
            return Ok(Placement::Rejected(preview));
        }
        Ok(Placement::Placed(self.insert_run(preview.edges, config)))
    }

    /// Remove a train and release its segments.
    pub fn remove_train(&mut self, id: TrainId) -> TrainResult<Train> {
        let train = self.trains.remove(id).ok_or(TrainError::NotFound(id))?;
        for edge in &train.run {
            self.occupancy.remove(edge);
        }
        info!("train removed: {id}");
        Ok(train)
    }

    /// Swap the head and tail of a train.  Its segments stay claimed.
    pub fn reverse_train(&mut self, id: TrainId, graph: &NetworkGraph) -> TrainResult<()> {
        self.trains.get_mut(id).ok_or(TrainError::NotFound(id))?.reverse(graph)?;
        debug!("train reversed: {id}");
        Ok(())
    }

    /// Advance one train by `dt` seconds, updating the occupancy index.
    pub fn advance_train(
        &mut self,
        id: TrainId,
        dt: f64,
        graph: &NetworkGraph,
        stop_within: Option<f64>,
    ) -> TrainResult<Motion> {
        let occupancy = &self.occupancy;
        let train = self.trains.get_mut(id).ok_or(TrainError::NotFound(id))?;
        let motion = train.advance(dt, graph, |e| !occupancy.contains_key(e), stop_within)?;
        for edge in &motion.left {
            self.occupancy.remove(edge);
        }
        for edge in &motion.entered {
            self.occupancy.insert(*edge, id);
        }
        Ok(motion)
    }

    pub fn assign_schedule(&mut self, id: TrainId, schedule: Option<ScheduleId>) -> TrainResult<()> {
        self.trains.get_mut(id).ok_or(TrainError::NotFound(id))?.schedule = schedule;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The train occupying `edge`, in either orientation.
    pub fn get_train_on_edge(&self, edge: &Edge) -> Option<TrainId> {
        self.occupancy.get(edge).copied()
    }

    /// The run of train `id`, tail first.
    pub fn occupied_edges(&self, id: TrainId) -> TrainResult<&[Edge]> {
        self.trains.get(id).map(|t| t.run.as_slice()).ok_or(TrainError::NotFound(id))
    }

    pub fn get(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(id)
    }

    pub fn require(&self, id: TrainId) -> TrainResult<&Train> {
        self.trains.get(id).ok_or(TrainError::NotFound(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Train> + '_ {
        self.trains.all()
    }

    pub fn ids(&self) -> impl Iterator<Item = TrainId> + '_ {
        self.trains.ids()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Number of claimed segments.
    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    // ── Archive ───────────────────────────────────────────────────────────

    pub fn to_archive(&self) -> Vec<Train> {
        self.trains.to_archive()
    }

    /// Rebuild a repository, re-checking every run against `graph`.
    pub fn from_archive(trains: Vec<Train>, graph: &NetworkGraph) -> TrainResult<Self> {
        let mut repo = Self::new();
        for train in trains {
            train.config.validate()?;
            if train.run.is_empty() || !walk::is_connected_run(&train.run) {
                return Err(TrainError::InvalidRun("stored run is not a connected sequence"));
            }
            for edge in &train.run {
                walk::edge_length(graph, edge)?;
                repo.check_unclaimed(edge)?;
            }
            let required = train.config.length();
            let available = train.run_length(graph)?;
            if (available as f64) < required as f64 + train.head_offset {
                return Err(TrainError::InsufficientLength { available, required });
            }
            let id = train.id;
            let run = train.run.clone();
            repo.trains.add(train)?;
            for edge in run {
                repo.occupancy.insert(edge, id);
            }
        }
        Ok(repo)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn check_unclaimed(&self, edge: &Edge) -> TrainResult<()> {
        match self.occupancy.get(edge) {
            Some(&train) => Err(TrainError::Occupied { edge: *edge, train }),
            None => Ok(()),
        }
    }

    fn insert_run(&mut self, run: Vec<Edge>, config: TrainConfig) -> TrainId {
        let id = self.trains.next_id();
        for edge in &run {
            self.occupancy.insert(*edge, id);
        }
        info!("train placed: {id} on {} segments", run.len());
        self.trains.insert(Train::new(id, run, config));
        id
    }
}
