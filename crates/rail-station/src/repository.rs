//! Station repository with an R-tree footprint index.
//!
//! # Footprints
//!
//! A station covers the cells within `width / 2` columns and `height / 2`
//! rows of its anchor, on the anchor's level only, so tunnel track can run
//! underneath a surface station.  Two stations overlap iff
//! `|Δx| < width + 1` and `|Δy| < height + 1` on the same level.
//!
//! Anchors are indexed in an `rstar` R-tree keyed by `[x, y, level]`.  A
//! footprint query is an envelope query around the queried cell, so both
//! `is_within_any` and the overlap check stay logarithmic in the number of
//! stations.
//!
//! # Platforms
//!
//! Platform segments are additionally indexed edge → station, which keeps
//! `is_edge_platform` and `get_platform_from_edge` cheap enough for the
//! per-tick docking check.  No segment may belong to two platforms,
//! whether of the same station or of different ones.

use std::collections::BTreeMap;

use log::{info, warn};
use rstar::{AABB, RTree, RTreeObject};

use rail_core::{CoreError, NetworkConfig, Node, Repository, StationId};
use rail_graph::{Edge, FootprintIndex, NetworkGraph};

use crate::{Platform, Station, StationError, StationResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct AnchorEntry {
    point: [i32; 3],
    id: StationId,
}

impl AnchorEntry {
    fn new(id: StationId, anchor: Node) -> Self {
        Self { point: [anchor.x, anchor.y, anchor.level as i32], id }
    }
}

impl RTreeObject for AnchorEntry {
    type Envelope = AABB<[i32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// Envelope of all anchors within `(dx, dy)` of `node` on its level.
fn envelope_around(node: Node, dx: i32, dy: i32) -> AABB<[i32; 3]> {
    let level = node.level as i32;
    AABB::from_corners(
        [node.x.saturating_sub(dx), node.y.saturating_sub(dy), level],
        [node.x.saturating_add(dx), node.y.saturating_add(dy), level],
    )
}

// ── StationRepository ─────────────────────────────────────────────────────────

/// All stations of the network.
#[derive(Debug)]
pub struct StationRepository {
    stations: Repository<Station>,
    anchors: RTree<AnchorEntry>,
    platform_index: BTreeMap<Edge, StationId>,
    width: u32,
    height: u32,
}

impl Default for StationRepository {
    fn default() -> Self {
        Self::new(&NetworkConfig::default())
    }
}

impl Clone for StationRepository {
    fn clone(&self) -> Self {
        Self {
            stations: self.stations.clone(),
            anchors: RTree::bulk_load(self.anchors.iter().cloned().collect()),
            platform_index: self.platform_index.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Two repositories are equal when they hold the same stations under the
/// same footprint size; the indexes are derived data.
impl PartialEq for StationRepository {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.stations == other.stations
    }
}

impl StationRepository {
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            stations: Repository::new(),
            anchors: RTree::new(),
            platform_index: BTreeMap::new(),
            width: config.station_width,
            height: config.station_height,
        }
    }

    fn half_extents(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a station.
    ///
    /// Rejected if its footprint overlaps another station, if two of its
    /// platforms share a segment, if a platform segment already belongs to
    /// another station, or (when `graph` is given) if a platform segment is
    /// not track.  The repository is unchanged on error.
    pub fn add(&mut self, station: Station, graph: Option<&NetworkGraph>) -> StationResult<StationId> {
        if self.stations.contains(station.id) {
            return Err(CoreError::DuplicateId(station.id.to_string()).into());
        }
        if let Some(other) = self.overlaps(station.anchor) {
            warn!("rejected station {station}: overlaps {other}");
            return Err(StationError::Overlap { anchor: station.anchor, other });
        }
        if let Some(edge) = station.first_internal_conflict() {
            warn!("rejected station {station}: two of its platforms share {edge}");
            return Err(StationError::PlatformConflict { edge, station: station.id });
        }
        for platform in &station.platforms {
            self.check_platform(platform, graph)?;
        }

        let id = station.id;
        self.anchors.insert(AnchorEntry::new(id, station.anchor));
        for edge in station.platform_edges() {
            self.platform_index.insert(edge, id);
        }
        info!("station added: {station} with {} platforms", station.platforms.len());
        self.stations.add(station)?;
        Ok(id)
    }

    /// Create and add a station with the next free id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        anchor: Node,
        platforms: Vec<Platform>,
        graph: Option<&NetworkGraph>,
    ) -> StationResult<StationId> {
        let station = Station::new(self.stations.next_id(), name, anchor).with_platforms(platforms);
        self.add(station, graph)
    }

    /// Remove a station together with its footprint and platforms.
    pub fn remove(&mut self, id: StationId) -> StationResult<Station> {
        let station = self.stations.remove(id).ok_or(StationError::NotFound(id))?;
        self.anchors.remove(&AnchorEntry::new(id, station.anchor));
        for edge in station.platform_edges() {
            self.platform_index.remove(&edge);
        }
        info!("station removed: {station}");
        Ok(station)
    }

    /// Attach a further platform to an existing station.
    pub fn add_platform(
        &mut self,
        id: StationId,
        platform: Platform,
        graph: Option<&NetworkGraph>,
    ) -> StationResult<()> {
        if !self.stations.contains(id) {
            return Err(StationError::NotFound(id));
        }
        self.check_platform(&platform, graph)?;
        for edge in platform.edges() {
            self.platform_index.insert(edge, id);
        }
        let station = self.stations.get_mut(id).ok_or(StationError::NotFound(id))?;
        station.platforms.push(platform);
        info!("platform added to {id}");
        Ok(())
    }

    /// Detach the platform of station `id` that contains `edge`.
    pub fn remove_platform(&mut self, id: StationId, edge: &Edge) -> StationResult<Platform> {
        let station = self.stations.get_mut(id).ok_or(StationError::NotFound(id))?;
        let pos = station
            .platforms
            .iter()
            .position(|p| p.contains(edge))
            .ok_or(StationError::NoSuchPlatform { station: id, edge: *edge })?;
        let platform = station.platforms.remove(pos);
        for e in platform.edges() {
            self.platform_index.remove(&e);
        }
        info!("platform removed from {id}");
        Ok(platform)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn require(&self, id: StationId) -> StationResult<&Station> {
        self.stations.get(id).ok_or(StationError::NotFound(id))
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.stations.contains(id)
    }

    /// All stations in id order.
    pub fn all(&self) -> impl Iterator<Item = &Station> + '_ {
        self.stations.all()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn next_id(&self) -> StationId {
        self.stations.next_id()
    }

    /// `true` if `node` lies inside any station footprint.
    pub fn is_within_any(&self, node: Node) -> bool {
        let (hw, hh) = self.half_extents();
        self.anchors
            .locate_in_envelope_intersecting(&envelope_around(node, hw, hh))
            .next()
            .is_some()
    }

    /// The station whose footprint covers `node`; the lowest id wins if
    /// footprints were ever loaded overlapping.
    pub fn get_by_node(&self, node: Node) -> Option<&Station> {
        let (hw, hh) = self.half_extents();
        self.anchors
            .locate_in_envelope_intersecting(&envelope_around(node, hw, hh))
            .map(|entry| entry.id)
            .min()
            .and_then(|id| self.stations.get(id))
    }

    /// The first station (lowest id) whose footprint would overlap a new
    /// station anchored at `anchor`.
    pub fn overlaps(&self, anchor: Node) -> Option<StationId> {
        self.anchors
            .locate_in_envelope_intersecting(&envelope_around(
                anchor,
                self.width as i32,
                self.height as i32,
            ))
            .map(|entry| entry.id)
            .min()
    }

    pub fn is_edge_platform(&self, edge: &Edge) -> bool {
        self.platform_index.contains_key(edge)
    }

    /// The station owning the platform that contains `edge`.
    pub fn station_at_edge(&self, edge: &Edge) -> Option<StationId> {
        self.platform_index.get(edge).copied()
    }

    /// The platform containing `edge`.
    pub fn get_platform_from_edge(&self, edge: &Edge) -> Option<&Platform> {
        let id = self.platform_index.get(edge)?;
        self.stations.get(*id)?.platform_with(edge)
    }

    // ── Archive ───────────────────────────────────────────────────────────

    /// Stations in id order.
    pub fn to_archive(&self) -> Vec<Station> {
        self.stations.to_archive()
    }

    /// Rebuild a repository, re-checking every footprint and platform.
    pub fn from_archive(
        stations: Vec<Station>,
        config: &NetworkConfig,
        graph: Option<&NetworkGraph>,
    ) -> StationResult<Self> {
        let mut repo = Self::new(config);
        for station in stations {
            repo.add(station, graph)?;
        }
        Ok(repo)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn check_platform(&self, platform: &Platform, graph: Option<&NetworkGraph>) -> StationResult<()> {
        if platform.is_empty() {
            return Err(StationError::EmptyPlatform);
        }
        for edge in platform.edges() {
            if let Some(&station) = self.platform_index.get(&edge) {
                warn!("rejected platform: {edge} already belongs to {station}");
                return Err(StationError::PlatformConflict { edge, station });
            }
            if graph.is_some_and(|g| !g.has_edge(&edge)) {
                return Err(StationError::EdgeNotInGraph(edge));
            }
        }
        Ok(())
    }
}

impl FootprintIndex for StationRepository {
    fn is_within_any(&self, node: Node) -> bool {
        StationRepository::is_within_any(self, node)
    }
}
