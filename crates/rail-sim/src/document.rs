//! The persisted form of a [`World`].
//!
//! A [`NetworkDocument`] holds every repository in its archive form:
//!
//! | Field        | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | `graph`      | nodes, segments with attributes, node attributes (signals included) |
//! | `stations`   | stations with anchors and platforms                 |
//! | `trains`     | runs, configs, kinematic state, assigned schedule   |
//! | `routes`     | stops with relative times, headway, day bounds      |
//! | `schedules`  | absolute stop times and playback position           |
//! | `timetables` | remaining start times per route                     |
//!
//! Loading rebuilds every index and checks every cross-reference.  Either
//! the whole document loads or nothing does.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use rail_core::{NetworkConfig, PathfinderConfig, Repository};
use rail_graph::{GraphArchive, NetworkGraph};
use rail_schedule::{Route, Schedule, Timetable, TimetableRepository};
use rail_station::{Station, StationRepository};
use rail_train::{Train, TrainRepository};

use crate::{SimError, SimResult, World};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDocument {
    pub graph: GraphArchive,
    pub stations: Vec<Station>,
    pub trains: Vec<Train>,
    pub routes: Vec<Route>,
    pub schedules: Vec<Schedule>,
    pub timetables: Vec<Timetable>,
}

impl NetworkDocument {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl World {
    pub fn to_document(&self) -> NetworkDocument {
        NetworkDocument {
            graph: self.graph.to_archive(),
            stations: self.stations.to_archive(),
            trains: self.trains.to_archive(),
            routes: self.routes.to_archive(),
            schedules: self.schedules.to_archive(),
            timetables: self.timetables.to_archive(),
        }
    }

    /// Rebuild a world from a document, validating every reference.
    pub fn from_document(
        doc: NetworkDocument,
        network: NetworkConfig,
        pathfinder: PathfinderConfig,
    ) -> SimResult<World> {
        let mut world = World::new(network, pathfinder);
        world.graph = NetworkGraph::from_archive(doc.graph)?;
        world.stations = StationRepository::from_archive(doc.stations, &world.network, Some(&world.graph))?;
        world.trains = TrainRepository::from_archive(doc.trains, &world.graph)?;
        world.routes = Repository::from_archive(doc.routes)?;
        world.schedules = Repository::from_archive(doc.schedules)?;
        world.timetables = TimetableRepository::from_archive(doc.timetables)?;
        world.check_references()?;
        info!(
            "document loaded: {} segments, {} stations, {} trains, {} routes",
            world.graph.edge_count(),
            world.stations.len(),
            world.trains.len(),
            world.routes.len()
        );
        Ok(world)
    }

    pub fn to_json(&self) -> SimResult<String> {
        self.to_document().to_json()
    }

    /// Replace this world with the one in `json`, keeping its configs.
    /// On error `self` is untouched.
    pub fn load_json(&mut self, json: &str) -> SimResult<()> {
        let doc = NetworkDocument::from_json(json)?;
        *self = World::from_document(doc, self.network.clone(), self.pathfinder.config.clone())?;
        Ok(())
    }

    pub fn save_file(&self, path: &Path) -> SimResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> SimResult<()> {
        let json = std::fs::read_to_string(path)?;
        self.load_json(&json)
    }

    fn check_references(&self) -> SimResult<()> {
        for route in self.routes.all() {
            if let Some(stop) = route.stops.iter().find(|s| !self.stations.contains(s.station)) {
                return Err(SimError::Dangling(format!("{} stops at unknown {}", route.id, stop.station)));
            }
        }
        for schedule in self.schedules.all() {
            if !self.routes.contains(schedule.route) {
                return Err(SimError::Dangling(format!("{} runs unknown {}", schedule.id, schedule.route)));
            }
            if let Some(stop) = schedule.stops.iter().find(|s| !self.stations.contains(s.station)) {
                return Err(SimError::Dangling(format!("{} stops at unknown {}", schedule.id, stop.station)));
            }
            if schedule.stops.len() < 2 || schedule.position >= schedule.stops.len() {
                return Err(SimError::Dangling(format!("{} has no valid playback position", schedule.id)));
            }
        }
        for timetable in self.timetables.all() {
            if !self.routes.contains(timetable.route) {
                return Err(SimError::Dangling(format!("timetable of unknown {}", timetable.route)));
            }
        }
        for train in self.trains.all() {
            match train.schedule {
                Some(schedule) if !self.schedules.contains(schedule) => {
                    return Err(SimError::Dangling(format!("{} runs unknown {schedule}", train.id)));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
