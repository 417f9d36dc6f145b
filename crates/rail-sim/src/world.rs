//! The `World` aggregate: one owner for the graph and every repository.
//!
//! Every construction operation is a single `&mut self` call that checks
//! the whole state it depends on before mutating anything, so a failed
//! call leaves the world exactly as it was.
//!
//! # Station removal
//!
//! [`World::remove_station`] drops the station and its platforms, then
//! strips the station from every route and schedule stop.  Schedules left
//! with fewer than two stops are deleted and the trains running them become
//! idle.

use log::{debug, info, warn};

use rail_core::{
    Duration, NetworkConfig, Node, PathfinderConfig, Pose, Repository, RouteId, ScheduleId, SimConfig,
    StationId, Time, TrainId,
};
use rail_graph::{AStarPathfinder, Edge, NetworkGraph, Pathfinder};
use rail_schedule::{
    remove_station_from_all_stops, Route, RouteRepository, RouteStop, Schedule, ScheduleRepository,
    StopRemoval, TimetableRepository,
};
use rail_station::{Platform, StationRepository};
use rail_train::{Placement, Preview, Train, TrainConfig, TrainRepository};

use crate::{SimError, SimResult};

#[derive(Clone, Debug)]
pub struct World {
    pub(crate) network: NetworkConfig,
    pub(crate) pathfinder: AStarPathfinder,
    pub(crate) graph: NetworkGraph,
    pub(crate) stations: StationRepository,
    pub(crate) trains: TrainRepository,
    pub(crate) routes: RouteRepository,
    pub(crate) schedules: ScheduleRepository,
    pub(crate) timetables: TimetableRepository,
}

/// Equal when the persisted state is equal; the pathfinder is not state.
impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network
            && self.graph == other.graph
            && self.stations == other.stations
            && self.trains == other.trains
            && self.routes == other.routes
            && self.schedules == other.schedules
            && self.timetables == other.timetables
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(NetworkConfig::default(), PathfinderConfig::default())
    }
}

impl World {
    pub fn new(network: NetworkConfig, pathfinder: PathfinderConfig) -> Self {
        Self {
            stations: StationRepository::new(&network),
            network,
            pathfinder: AStarPathfinder::new(pathfinder),
            graph: NetworkGraph::new(),
            trains: TrainRepository::new(),
            routes: Repository::new(),
            schedules: Repository::new(),
            timetables: TimetableRepository::new(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.network.clone(), config.pathfinder.clone())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn network_config(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn stations(&self) -> &StationRepository {
        &self.stations
    }

    pub fn trains(&self) -> &TrainRepository {
        &self.trains
    }

    pub fn routes(&self) -> &RouteRepository {
        &self.routes
    }

    pub fn schedules(&self) -> &ScheduleRepository {
        &self.schedules
    }

    pub fn timetables(&self) -> &TimetableRepository {
        &self.timetables
    }

    // ── Track ─────────────────────────────────────────────────────────────

    /// Lay track along `nodes` directly, without a search.  `speed`
    /// defaults to the network's default track speed.
    pub fn lay_track(&mut self, nodes: &[Node], speed: Option<u32>) -> SimResult<Vec<Edge>> {
        let speed = speed.unwrap_or(self.network.default_track_speed);
        Ok(self.graph.add_path(nodes, speed, self.network.track_unit_length)?)
    }

    /// Search a buildable path from `start` to `target` and lay it.
    ///
    /// `Ok(None)` when no path exists; the graph is unchanged.
    pub fn extend_track(&mut self, start: Pose, target: Pose, speed: Option<u32>) -> SimResult<Option<Vec<Edge>>> {
        let Some(nodes) = self.pathfinder.find_path(&self.graph, &self.stations, start, target)? else {
            debug!("no track from {start:?} to {target:?}");
            return Ok(None);
        };
        self.lay_track(&nodes, speed).map(Some)
    }

    /// Remove a segment.  Fails while a train occupies it; a platform that
    /// contains it is detached from its station first.
    pub fn remove_track(&mut self, edge: &Edge) -> SimResult<()> {
        if !self.graph.has_edge(edge) {
            return Err(rail_graph::GraphError::EdgeNotFound(*edge).into());
        }
        if let Some(train) = self.trains.get_train_on_edge(edge) {
            warn!("rejected track removal: {edge} is occupied by {train}");
            return Err(SimError::TrackInUse { edge: *edge, train });
        }
        if let Some(station) = self.stations.station_at_edge(edge) {
            self.stations.remove_platform(station, edge)?;
        }
        self.graph.remove_edge(edge)?;
        Ok(())
    }

    pub fn add_signal(&mut self, pose: Pose) -> SimResult<()> {
        Ok(self.graph.add_signal(pose)?)
    }

    pub fn remove_signal(&mut self, pose: Pose) -> bool {
        self.graph.remove_signal(pose)
    }

    // ── Stations ──────────────────────────────────────────────────────────

    pub fn add_station(&mut self, name: impl Into<String>, anchor: Node, platforms: Vec<Platform>) -> SimResult<StationId> {
        Ok(self.stations.create(name, anchor, platforms, Some(&self.graph))?)
    }

    pub fn add_platform(&mut self, station: StationId, platform: Platform) -> SimResult<()> {
        Ok(self.stations.add_platform(station, platform, Some(&self.graph))?)
    }

    /// Remove a station and every stop that refers to it.
    pub fn remove_station(&mut self, id: StationId) -> SimResult<StopRemoval> {
        self.stations.remove(id)?;
        let removal =
            remove_station_from_all_stops(id, &mut self.routes, &mut self.schedules, &mut self.timetables);
        self.release_trains_of(&removal.dropped_schedules);
        Ok(removal)
    }

    // ── Trains ────────────────────────────────────────────────────────────

    pub fn preview_train(&self, start_edge: Edge, config: &TrainConfig) -> SimResult<Preview> {
        Ok(self.trains.calculate_preview(&self.graph, start_edge, config.length())?)
    }

    pub fn place_train(&mut self, start_edge: Edge, config: TrainConfig) -> SimResult<Placement> {
        Ok(self.trains.place_train(&self.graph, start_edge, config)?)
    }

    pub fn create_train(&mut self, edges: Vec<Edge>, config: TrainConfig) -> SimResult<TrainId> {
        Ok(self.trains.create_train(&self.graph, edges, config)?)
    }

    /// Remove a train together with the schedule it was running.
    pub fn remove_train(&mut self, id: TrainId) -> SimResult<Train> {
        let train = self.trains.remove_train(id)?;
        if let Some(schedule) = train.schedule {
            self.schedules.remove(schedule);
        }
        Ok(train)
    }

    pub fn reverse_train(&mut self, id: TrainId) -> SimResult<()> {
        Ok(self.trains.reverse_train(id, &self.graph)?)
    }

    // ── Routes and timetables ─────────────────────────────────────────────

    /// Add a route and give it a timetable for the day.  Every stop must be
    /// an existing station.
    pub fn add_route(&mut self, route: Route) -> SimResult<RouteId> {
        route.validate()?;
        self.check_stops(&route.stops)?;
        let times = rail_schedule::start_times_for(&route)?;
        let id = self.routes.add(route)?;
        self.timetables.add_timetable(id);
        for time in times {
            self.timetables.return_start_time(id, time)?;
        }
        info!("route added: {id}");
        Ok(id)
    }

    pub fn create_route(
        &mut self,
        name: impl Into<String>,
        stops: Vec<RouteStop>,
        frequency: Duration,
        first_train: Time,
        last_train: Time,
    ) -> SimResult<RouteId> {
        let route = Route::new(self.routes.next_id(), name, stops, frequency, first_train, last_train);
        self.add_route(route)
    }

    /// Remove a route, its timetable and its schedules.  Trains running
    /// those schedules become idle.
    pub fn remove_route(&mut self, id: RouteId) -> SimResult<Route> {
        let route = self.routes.remove(id).ok_or(rail_schedule::ScheduleError::RouteNotFound(id))?;
        self.timetables.remove(id);
        let dropped: Vec<ScheduleId> =
            self.schedules.all().filter(|s| s.route == id).map(|s| s.id).collect();
        for schedule in &dropped {
            self.schedules.remove(*schedule);
        }
        self.release_trains_of(&dropped);
        info!("route removed: {id}");
        Ok(route)
    }

    /// Recompute every timetable from its route.
    pub fn calculate_start_times(&mut self) -> SimResult<()> {
        Ok(self.timetables.calculate_start_times(&self.routes)?)
    }

    pub fn return_start_time(&mut self, route: RouteId, time: Time) -> SimResult<bool> {
        Ok(self.timetables.return_start_time(route, time)?)
    }

    /// Project every start time of `route` into a stored schedule.
    pub fn generate_schedules(&mut self, route: RouteId) -> SimResult<Vec<ScheduleId>> {
        let route = self.routes.get(route).ok_or(rail_schedule::ScheduleError::RouteNotFound(route))?;
        Ok(self.timetables.generate_schedules(route, &mut self.schedules)?)
    }

    // ── Dispatch support ──────────────────────────────────────────────────

    /// Instantiate `route` at `start` and hand the schedule to `train`.
    pub(crate) fn dispatch(&mut self, route: RouteId, start: Time, train: TrainId) -> SimResult<ScheduleId> {
        self.trains.require(train)?;
        let route = self.routes.get(route).ok_or(rail_schedule::ScheduleError::RouteNotFound(route))?;
        let schedule = Schedule::from_route(self.schedules.next_id(), route, start)?;
        let id = self.schedules.add(schedule)?;
        self.trains.assign_schedule(train, Some(id))?;
        Ok(id)
    }

    /// Detach and delete the schedule `train` has run to its end.
    pub(crate) fn finish_schedule(&mut self, train: TrainId) -> SimResult<Option<ScheduleId>> {
        let schedule = self.trains.require(train)?.schedule;
        self.trains.assign_schedule(train, None)?;
        if let Some(id) = schedule {
            self.schedules.remove(id);
        }
        Ok(schedule)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn check_stops(&self, stops: &[RouteStop]) -> SimResult<()> {
        match stops.iter().find(|s| !self.stations.contains(s.station)) {
            Some(stop) => Err(SimError::Dangling(format!("route stop at unknown {}", stop.station))),
            None => Ok(()),
        }
    }

    fn release_trains_of(&mut self, schedules: &[ScheduleId]) {
        if schedules.is_empty() {
            return;
        }
        let trains: Vec<TrainId> = self
            .trains
            .all()
            .filter(|t| t.schedule.is_some_and(|s| schedules.contains(&s)))
            .map(|t| t.id)
            .collect();
        for train in trains {
            if self.trains.assign_schedule(train, None).is_ok() {
                debug!("{train} released: its schedule was deleted");
            }
        }
    }
}
