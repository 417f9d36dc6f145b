//! `Train`, its configuration, and train kinematics.
//!
//! # Position model
//!
//! A train's `run` is the sequence of segments it occupies, tail first,
//! each oriented in the direction of travel (`run[i].end == run[i+1].start`).
//! The train itself is a `length()`-metre stretch inside the run:
//!
//! ```text
//!   run start                                        run end
//!   |----------|==========|============|=====-----|
//!              ^ tail                         ^ head
//!   <- tail gap ->                             <- head_offset ->
//! ```
//!
//! `head_offset` is the occupied track still in front of the head.  The gap
//! behind the tail follows from the run length, so reversing a train just
//! swaps the two gaps.  The run always covers the whole train.
//!
//! # Kinematics
//!
//! Each [`Train::advance`] step accelerates towards the lowest speed limit
//! under the train (and the train's own maximum), but never faster than it
//! can still stop within the free track ahead or an explicit stop point.
//! Moving the head claims continuation segments in front; segments the tail
//! has fully left are released.

use log::debug;

use rail_core::{Entity, ScheduleId, TrainId};
use rail_graph::{Edge, NetworkGraph};

use crate::walk;
use crate::{TrainError, TrainResult};

/// Track speed limits and `max_speed` are in km/h; kinematics run in m/s.
pub const KMH_PER_MPS: f64 = 3.6;

/// Remaining distance (metres) below which a braking train counts as
/// having reached its stop point.
pub const STOP_TOLERANCE: f64 = 0.01;

// ── TrainConfig ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainConfig {
    pub cars: u32,
    /// Metres per car.
    pub car_length: u32,
    /// m/s².
    pub acceleration: f64,
    /// m/s², positive.
    pub deceleration: f64,
    /// km/h.
    pub max_speed: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            cars:         3,
            car_length:   20,
            acceleration: 0.8,
            deceleration: 1.0,
            max_speed:    120,
        }
    }
}

impl TrainConfig {
    /// Physical length in metres.
    pub fn length(&self) -> u32 {
        self.cars.saturating_mul(self.car_length)
    }

    pub fn max_speed_mps(&self) -> f64 {
        self.max_speed as f64 / KMH_PER_MPS
    }

    /// Distance needed to stop from `speed` (m/s).
    pub fn braking_distance(&self, speed: f64) -> f64 {
        speed * speed / (2.0 * self.deceleration)
    }

    pub fn validate(&self) -> TrainResult<()> {
        if self.cars == 0 || self.car_length == 0 {
            return Err(TrainError::InvalidConfig("a train needs at least one car of non-zero length".into()));
        }
        if !(self.acceleration > 0.0) || !(self.deceleration > 0.0) {
            return Err(TrainError::InvalidConfig("acceleration and deceleration must be > 0".into()));
        }
        if self.max_speed == 0 {
            return Err(TrainError::InvalidConfig("max_speed must be > 0".into()));
        }
        Ok(())
    }
}

// ── Train ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Train {
    pub id: TrainId,
    /// Occupied segments, tail first, oriented in the direction of travel.
    pub run: Vec<Edge>,
    pub config: TrainConfig,
    /// Metres of occupied track in front of the head.
    pub head_offset: f64,
    /// Current speed in m/s.
    pub speed: f64,
    /// Schedule the train is running, if any.
    pub schedule: Option<ScheduleId>,
}

/// What one [`Train::advance`] step did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Motion {
    /// Metres travelled.
    pub distance: f64,
    /// Segments claimed in front of the head, in order.
    pub entered: Vec<Edge>,
    /// Segments released behind the tail, in order.
    pub left: Vec<Edge>,
    /// The train came to a stop at the end of its available room.
    pub stopped: bool,
}

impl Entity for Train {
    type Id = TrainId;

    fn id(&self) -> TrainId {
        self.id
    }
}

impl Train {
    /// A standing train with its head at the far end of `run`.
    pub fn new(id: TrainId, run: Vec<Edge>, config: TrainConfig) -> Self {
        Self { id, run, config, head_offset: 0.0, speed: 0.0, schedule: None }
    }

    pub fn is_stopped(&self) -> bool {
        self.speed <= 0.0
    }

    /// Distance needed to stop from the current speed.
    pub fn braking_distance(&self) -> f64 {
        self.config.braking_distance(self.speed)
    }

    /// Total length of the run in metres.
    pub fn run_length(&self, graph: &NetworkGraph) -> TrainResult<u32> {
        self.run.iter().map(|e| walk::edge_length(graph, e)).sum()
    }

    /// Metres of occupied track behind the tail.
    pub fn tail_gap(&self, graph: &NetworkGraph) -> TrainResult<f64> {
        Ok(self.run_length(graph)? as f64 - self.head_offset - self.config.length() as f64)
    }

    /// The segment holding the head and the head's distance from that
    /// segment's start.
    pub fn head_position(&self, graph: &NetworkGraph) -> TrainResult<(Edge, f64)> {
        let mut slack = self.head_offset;
        for (i, edge) in self.run.iter().enumerate().rev() {
            let len = walk::edge_length(graph, edge)? as f64;
            if slack < len || i == 0 {
                return Ok((*edge, (len - slack).max(0.0)));
            }
            slack -= len;
        }
        Err(TrainError::InvalidRun("train has an empty run"))
    }

    /// Most restrictive speed limit under the train, in m/s.
    pub fn speed_limit(&self, graph: &NetworkGraph) -> TrainResult<f64> {
        let mut limit = self.config.max_speed;
        for edge in &self.run {
            limit = limit.min(walk::edge_speed(graph, edge)?);
        }
        Ok(limit as f64 / KMH_PER_MPS)
    }

    /// Swap head and tail.  The run keeps its segments, now listed and
    /// oriented the other way; the train stops.
    pub fn reverse(&mut self, graph: &NetworkGraph) -> TrainResult<()> {
        let tail_gap = self.tail_gap(graph)?;
        self.run.reverse();
        for edge in &mut self.run {
            *edge = edge.reversed();
        }
        self.head_offset = tail_gap.max(0.0);
        self.speed = 0.0;
        Ok(())
    }

    /// Advance the train by `dt` seconds.
    ///
    /// `is_free` reports whether a segment beyond the run may be claimed.
    /// `stop_within`, if given, is the distance from the head at which the
    /// train must be standing (a platform stop).
    pub fn advance(
        &mut self,
        dt: f64,
        graph: &NetworkGraph,
        is_free: impl Fn(&Edge) -> bool,
        stop_within: Option<f64>,
    ) -> TrainResult<Motion> {
        let mut motion = Motion::default();
        if !(dt > 0.0) {
            return Ok(motion);
        }
        let last = *self.run.last().ok_or(TrainError::InvalidRun("train has an empty run"))?;
        let (acc, dec) = (self.config.acceleration, self.config.deceleration);
        let limit = self.speed_limit(graph)?;
        let v0 = self.speed;

        let v_cap = v0 + acc * dt;
        let horizon = v_cap * dt + self.config.braking_distance(v_cap) + 1.0;
        let (ahead, track_room, open) = self.look_ahead(graph, last, &is_free, horizon)?;
        let mut room = if open { f64::INFINITY } else { track_room };
        if let Some(stop) = stop_within {
            room = room.min(stop.max(0.0));
        }

        let v_reach = if v0 < limit { (v0 + acc * dt).min(limit) } else { (v0 - dec * dt).max(limit) };
        // Fastest speed from which the train still stops within `room`.
        let v_room = if room.is_finite() {
            dec * ((dt * dt + 2.0 * room / dec).sqrt() - dt)
        } else {
            f64::INFINITY
        };
        let mut v = v_reach.min(v_room).max((v0 - dec * dt).max(0.0));
        let mut dist = v * dt;
        if dist >= room - STOP_TOLERANCE {
            dist = room;
            v = 0.0;
            motion.stopped = true;
        }
        self.speed = v;
        motion.distance = dist;

        self.head_offset -= dist;
        // A stop at a segment end must not spill onto the next segment.
        if motion.stopped && self.head_offset > -STOP_TOLERANCE {
            self.head_offset = self.head_offset.max(0.0);
        }
        let mut ahead = ahead.into_iter();
        while self.head_offset < 0.0 {
            match ahead.next() {
                Some((edge, len)) => {
                    self.run.push(edge);
                    motion.entered.push(edge);
                    self.head_offset += len as f64;
                }
                None => {
                    self.head_offset = 0.0;
                    break;
                }
            }
        }

        let mut gap = self.tail_gap(graph)?;
        while self.run.len() > 1 {
            let first_len = walk::edge_length(graph, &self.run[0])? as f64;
            if gap < first_len {
                break;
            }
            gap -= first_len;
            motion.left.push(self.run.remove(0));
        }

        if motion.stopped && dist > 0.0 {
            debug!("{} stopped after {dist:.1} m", self.id);
        }
        Ok(motion)
    }

    /// Free continuation segments beyond the run, up to `horizon` metres of
    /// room in front of the head.  Returns the segments with their lengths,
    /// the room found, and whether the walk reached the horizon unobstructed.
    fn look_ahead(
        &self,
        graph: &NetworkGraph,
        last: Edge,
        is_free: &impl Fn(&Edge) -> bool,
        horizon: f64,
    ) -> TrainResult<(Vec<(Edge, u32)>, f64, bool)> {
        let mut room = self.head_offset;
        let mut edges: Vec<(Edge, u32)> = Vec::new();
        let mut cur = last;
        while room < horizon {
            let next = match walk::next_edge(graph, cur) {
                Some(next)
                    if is_free(&next)
                        && !self.run.contains(&next)
                        && !edges.iter().any(|(e, _)| *e == next) =>
                {
                    next
                }
                _ => return Ok((edges, room, false)),
            };
            let len = walk::edge_length(graph, &next)?;
            room += len as f64;
            edges.push((next, len));
            cur = next;
        }
        Ok((edges, room, true))
    }
}
