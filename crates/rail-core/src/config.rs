//! Configuration records.
//!
//! Typically loaded from a JSON file by the application crate and passed
//! down by value.  Every field has a default, so a partial file is fine.

use crate::{CoreError, CoreResult, Time};

// ── TimeControlMode ───────────────────────────────────────────────────────────

/// Playback speed of the simulation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeControlMode {
    Paused,
    #[default]
    Play,
    FastForward,
    FastForwardMax,
}

impl TimeControlMode {
    /// Simulated seconds per wall-clock second.
    pub fn multiplier(self) -> u32 {
        match self {
            TimeControlMode::Paused         => 0,
            TimeControlMode::Play           => 1,
            TimeControlMode::FastForward    => 5,
            TimeControlMode::FastForwardMax => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeControlMode::Paused         => "paused",
            TimeControlMode::Play           => "play",
            TimeControlMode::FastForward    => "fast-forward",
            TimeControlMode::FastForwardMax => "fast-forward-max",
        }
    }
}

impl std::fmt::Display for TimeControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Geometry of the track grid and station footprints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Station footprint width in grid units.  The footprint covers
    /// `width / 2` cells either side of the anchor.
    pub station_width: u32,
    /// Station footprint height in grid units.
    pub station_height: u32,
    /// Track length of one axis-aligned grid step, in metres.  A diagonal
    /// step is `√2` times this.
    pub track_unit_length: u32,
    /// Speed limit given to newly laid track.
    pub default_track_speed: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            station_width:       4,
            station_height:      2,
            track_unit_length:   100,
            default_track_speed: 80,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.track_unit_length == 0 {
            return Err(CoreError::Config("track_unit_length must be > 0".into()));
        }
        if self.default_track_speed == 0 {
            return Err(CoreError::Config("default_track_speed must be > 0".into()));
        }
        Ok(())
    }
}

// ── PathfinderConfig ──────────────────────────────────────────────────────────

/// Bounds on the track-construction search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    /// Cells the search may stray outside the start/target bounding box.
    pub search_margin: u32,
    /// Node expansions after which the search gives up and reports no path.
    pub max_expansions: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self { search_margin: 16, max_expansions: 200_000 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick at `TimeControlMode::Play`.
    pub tick_secs: u32,
    /// Time of day at which the clock starts.
    pub start_time: Time,
    /// Playback speed at start.
    pub mode: TimeControlMode,
    pub network: NetworkConfig,
    pub pathfinder: PathfinderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_secs:  1,
            start_time: Time::MIDNIGHT,
            mode:       TimeControlMode::Play,
            network:    NetworkConfig::default(),
            pathfinder: PathfinderConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_secs == 0 {
            return Err(CoreError::Config("tick_secs must be > 0".into()));
        }
        self.network.validate()
    }

    /// Simulated seconds covered by one tick in the current mode.
    #[inline]
    pub fn secs_per_tick(&self, mode: TimeControlMode) -> u32 {
        self.tick_secs * mode.multiplier()
    }
}
