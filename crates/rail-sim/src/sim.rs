//! The `Sim` struct and its tick loop.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use rail_core::{
    Duration, RouteId, SimClock, SimConfig, StationId, Time, TimeControlMode, TrainId, SECS_PER_DAY,
};
use rail_graph::NetworkGraph;
use rail_station::StationRepository;
use rail_train::{walk, Train, STOP_TOLERANCE};

use crate::{SimError, SimObserver, SimResult, World};

/// What a scheduled train is doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrainPhase {
    /// No schedule.
    Idle,
    /// Standing at the current stop until its departure time.
    Dwelling,
    /// Driving towards the current stop.
    Running,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// One call to [`Sim::tick`] runs `mode.multiplier()` steps of
/// `config.tick_secs` simulated seconds each; a paused sim does nothing.
/// Every step:
///
/// 1. **Clock**: advance by `tick_secs`.  On a new day every timetable is
///    recomputed from its route.
/// 2. **Dispatch**: every start time that fell due during the step is
///    projected into a schedule and handed to an idle train standing at the
///    route's origin.  Without such a train the start is missed.
/// 3. **Trains**, in ascending `TrainId` order:
///    - `Dwelling` trains leave once the stop's departure time has passed.
///    - `Running` trains advance, braking for the platform of their current
///      stop once it is within braking range, and start dwelling when they
///      come to a stand there.  At the last stop the schedule is complete;
///      a train at a dead end is turned round.
pub struct Sim {
    pub config: SimConfig,
    pub clock: SimClock,
    pub mode: TimeControlMode,
    pub world: World,
    phases: BTreeMap<TrainId, TrainPhase>,
}

impl Sim {
    pub fn new(config: SimConfig, world: World) -> SimResult<Self> {
        config.validate().map_err(|e| SimError::Config(e.to_string()))?;
        Ok(Self {
            clock: SimClock::new(config.start_time),
            mode: config.mode,
            config,
            world,
            phases: BTreeMap::new(),
        })
    }

    pub fn set_mode(&mut self, mode: TimeControlMode) {
        info!("time control: {} -> {mode}", self.mode);
        self.mode = mode;
    }

    pub fn phase(&self, train: TrainId) -> TrainPhase {
        self.phases.get(&train).copied().unwrap_or(TrainPhase::Idle)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Advance by one tick in the current time control mode.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        for _ in 0..self.mode.multiplier() {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run exactly `n` steps regardless of the time control mode.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run steps until at least `secs` simulated seconds have passed.
    pub fn run_for<O: SimObserver>(&mut self, secs: u64, observer: &mut O) -> SimResult<()> {
        let until = self.clock.elapsed_secs + secs;
        while self.clock.elapsed_secs < until {
            self.step(observer)?;
        }
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let day = self.clock.day;
        self.clock.advance(self.config.tick_secs);
        if self.clock.day != day {
            self.world.calculate_start_times()?;
            info!("{}: timetables refreshed", self.clock);
        }
        observer.on_tick_start(&self.clock);

        self.dispatch_due(observer)?;

        let trains = &self.world.trains;
        self.phases.retain(|id, _| trains.get(*id).is_some());
        let ids: Vec<TrainId> = self.world.trains.ids().collect();
        for id in ids {
            self.step_train(id, observer)?;
        }

        observer.on_tick_end(&self.clock, &self.world);
        Ok(())
    }

    fn dispatch_due<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let window = Duration::from_secs(self.config.tick_secs);
        let origins: Vec<(RouteId, StationId)> = self
            .world
            .routes
            .all()
            .filter(|r| r.stops.len() >= 2)
            .map(|r| (r.id, r.stops[0].station))
            .collect();

        for (route, origin) in origins {
            while let Some(start) = self.world.timetables.take_due_start_time(route, self.clock.time, window) {
                match self.idle_train_at(origin) {
                    Some(train) => {
                        let schedule = self.world.dispatch(route, start, train)?;
                        self.phases.insert(train, TrainPhase::Dwelling);
                        info!("{}: {train} takes the {start} {route} as {schedule}", self.clock);
                        observer.on_dispatch(&self.clock, train, route, schedule);
                    }
                    None => {
                        warn!("{}: no idle train at {origin} for the {start} {route}", self.clock);
                        observer.on_missed_start(&self.clock, route, start);
                    }
                }
            }
        }
        Ok(())
    }

    /// The lowest-id train without a schedule, standing on a platform of
    /// `station`.
    fn idle_train_at(&self, station: StationId) -> Option<TrainId> {
        self.world
            .trains
            .all()
            .filter(|t| t.schedule.is_none() && t.is_stopped())
            .find(|t| t.run.iter().any(|e| self.world.stations.station_at_edge(e) == Some(station)))
            .map(|t| t.id)
    }

    fn step_train<O: SimObserver>(&mut self, id: TrainId, observer: &mut O) -> SimResult<()> {
        let Some(schedule_id) = self.world.trains.require(id)?.schedule else {
            self.phases.remove(&id);
            return Ok(());
        };
        let Some(schedule) = self.world.schedules.get(schedule_id) else {
            warn!("{id} runs missing {schedule_id}; released");
            self.world.trains.assign_schedule(id, None)?;
            self.phases.remove(&id);
            return Ok(());
        };
        let Some(stop) = schedule.current_stop().copied() else {
            return Ok(());
        };
        let finished = schedule.is_finished();
        let default_phase = if schedule.position == 0 { TrainPhase::Dwelling } else { TrainPhase::Running };
        let phase = *self.phases.entry(id).or_insert(default_phase);

        match phase {
            TrainPhase::Idle => {}
            TrainPhase::Dwelling if finished => self.complete(id, observer)?,
            TrainPhase::Dwelling => {
                if stop.departure.is_some_and(|dep| is_due(self.clock.time, dep)) {
                    if let Some(schedule) = self.world.schedules.get_mut(schedule_id) {
                        let next = schedule.depart_station()?.station;
                        debug!("{id} heads for {next}");
                    }
                    self.phases.insert(id, TrainPhase::Running);
                    observer.on_departure(&self.clock, id, stop.station);
                }
            }
            TrainPhase::Running => {
                let dt = self.config.tick_secs as f64;
                let train = self.world.trains.require(id)?;
                let stop_within = distance_to_platform(&self.world.graph, &self.world.stations, train, stop.station, dt)?;
                let motion = self.world.trains.advance_train(id, dt, &self.world.graph, stop_within)?;
                let arrived = motion.stopped && stop_within.is_some_and(|d| motion.distance >= d - STOP_TOLERANCE);
                if arrived {
                    info!("{}: {id} arrives at {}", self.clock, stop.station);
                    observer.on_arrival(&self.clock, id, stop.station);
                    if finished {
                        self.complete(id, observer)?;
                    } else {
                        self.phases.insert(id, TrainPhase::Dwelling);
                    }
                }
            }
        }
        Ok(())
    }

    /// End the schedule of `id`; a train at a dead end is turned round.
    fn complete<O: SimObserver>(&mut self, id: TrainId, observer: &mut O) -> SimResult<()> {
        let finished = self.world.finish_schedule(id)?;
        self.phases.remove(&id);
        let (head, _) = self.world.trains.require(id)?.head_position(&self.world.graph)?;
        if walk::next_edge(&self.world.graph, head).is_none() {
            self.world.reverse_train(id)?;
            debug!("{id} turned round at the end of the line");
        }
        if let Some(schedule) = finished {
            info!("{}: {id} completed {schedule}", self.clock);
            observer.on_schedule_complete(&self.clock, id, schedule);
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `true` once `departure` lies at or before `now` within the last half day.
fn is_due(now: Time, departure: Time) -> bool {
    now.since(departure).secs() < SECS_PER_DAY / 2
}

/// Metres from the head of `train` to the far end of the first segment
/// ahead that is a platform of `station`, if one lies within the distance
/// the train could still need to stop after one more `dt`-second step.
fn distance_to_platform(
    graph: &NetworkGraph,
    stations: &StationRepository,
    train: &Train,
    station: StationId,
    dt: f64,
) -> SimResult<Option<f64>> {
    let v_max = train.config.max_speed_mps();
    let horizon = train.config.braking_distance(v_max) + 2.0 * v_max * dt + 1.0;

    let (head, from_start) = train.head_position(graph)?;
    let mut dist = walk::edge_length(graph, &head)? as f64 - from_start;
    if stations.station_at_edge(&head) == Some(station) {
        return Ok(Some(dist.max(0.0)));
    }
    let mut cur = head;
    while dist <= horizon {
        let Some(next) = walk::next_edge(graph, cur) else {
            return Ok(None);
        };
        dist += walk::edge_length(graph, &next)? as f64;
        if stations.station_at_edge(&next) == Some(station) {
            return Ok(Some(dist));
        }
        cur = next;
    }
    Ok(None)
}
