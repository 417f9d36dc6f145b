//! shuttle: smallest example for the rail network model.
//!
//! One train shuttles along a three-station line for a morning peak:
//! eastbound from Harbour to Hill, then back west.  Both terminal platforms
//! are the last segment of the line, so the train turns round there.
//!
//! Usage: `shuttle [config.json]`.  The optional file holds a `SimConfig`;
//! missing fields take their defaults.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use rail_core::{Node, RouteId, ScheduleId, SimClock, SimConfig, StationId, Time, TimeControlMode, TrainId};
use rail_graph::Edge;
use rail_schedule::load_routes_reader;
use rail_sim::{Sim, SimObserver, World};
use rail_station::Platform;
use rail_train::TrainConfig;

// ── Constants ─────────────────────────────────────────────────────────────────

const LINE_START: i32 = 2;
const LINE_END:   i32 = 37;
const RUN_UNTIL:  Time = Time::from_hm(8, 30);

// Station ids follow the order the stations are added in `build_line`.
const ROUTES_CSV: &str = "\
route_id,name,station_id,travel_secs,dwell_secs,frequency_secs,first_train,last_train\n\
0,Eastbound,0,0,0,1200,06:00:00,08:00:00\n\
0,Eastbound,1,180,30,1200,06:00:00,08:00:00\n\
0,Eastbound,2,180,0,1200,06:00:00,08:00:00\n\
1,Westbound,2,0,0,1200,06:10:00,08:10:00\n\
1,Westbound,1,180,30,1200,06:10:00,08:10:00\n\
1,Westbound,0,180,0,1200,06:10:00,08:10:00\n\
";

// ── Network ───────────────────────────────────────────────────────────────────

fn east(x: i32) -> Edge {
    Edge::new(Node::surface(x, 0), Node::surface(x + 1, 0))
}

/// Lay the line and its three stations.  Returns the Harbour platform.
fn build_line(world: &mut World) -> Result<Vec<Edge>> {
    let nodes: Vec<Node> = (LINE_START..=LINE_END).map(|x| Node::surface(x, 0)).collect();
    world.lay_track(&nodes, None)?;

    let harbour = vec![east(LINE_START)];
    world.add_station("Harbour", Node::surface(3, 0), vec![Platform::new(harbour.clone())])?;
    world.add_station("Market", Node::surface(20, 0), vec![Platform::new([east(19), east(20)])])?;
    world.add_station("Hill", Node::surface(36, 0), vec![Platform::new([east(LINE_END - 1)])])?;
    Ok(harbour)
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingObserver {
    dispatches:  usize,
    missed:      usize,
    arrivals:    usize,
    completions: usize,
}

impl SimObserver for CountingObserver {
    fn on_dispatch(&mut self, clock: &SimClock, train: TrainId, route: RouteId, _schedule: ScheduleId) {
        self.dispatches += 1;
        println!("{}  {train} departs on {route}", clock.time);
    }

    fn on_missed_start(&mut self, clock: &SimClock, route: RouteId, start: Time) {
        self.missed += 1;
        println!("{}  no train for the {start} {route}", clock.time);
    }

    fn on_arrival(&mut self, clock: &SimClock, train: TrainId, station: StationId) {
        self.arrivals += 1;
        println!("{}  {train} at {station}", clock.time);
    }

    fn on_schedule_complete(&mut self, _clock: &SimClock, _train: TrainId, _schedule: ScheduleId) {
        self.completions += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<SimConfig>(&json).with_context(|| format!("parsing {path}"))?
        }
        None => SimConfig { start_time: Time::from_hm(5, 59), ..SimConfig::default() },
    };
    println!("=== shuttle: rail network model ===");

    // 1. Track and stations.
    let mut world = World::from_config(&config);
    let harbour = build_line(&mut world)?;
    println!(
        "Line: {} nodes, {} segments, {} stations",
        world.graph().node_count(),
        world.graph().edge_count(),
        world.stations().len()
    );

    // 2. One two-car train standing at Harbour, facing east.
    let train = world.create_train(harbour, TrainConfig { cars: 2, car_length: 40, ..TrainConfig::default() })?;

    // 3. Routes from the embedded CSV.
    for route in load_routes_reader(Cursor::new(ROUTES_CSV))? {
        let id = world.add_route(route)?;
        info!("{id}: {} start times", world.timetables().start_times(id).len());
    }

    // 4. Run at full speed until the end of the peak.
    let mut sim = Sim::new(config, world)?;
    sim.set_mode(TimeControlMode::FastForwardMax);
    let mut obs = CountingObserver::default();

    let t0 = Instant::now();
    let secs = RUN_UNTIL.since(sim.clock.time).secs() as u64;
    while sim.clock.elapsed_secs < secs {
        sim.tick(&mut obs)?;
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulated {} s in {:.3} s", sim.clock.elapsed_secs, elapsed.as_secs_f64());
    println!("  dispatches  : {}", obs.dispatches);
    println!("  arrivals    : {}", obs.arrivals);
    println!("  completions : {}", obs.completions);
    println!("  missed      : {}", obs.missed);

    let t = sim.world.trains().require(train)?;
    let (head, along) = t.head_position(sim.world.graph())?;
    println!("{train}: head on {head} at {along:.1} m, phase {:?}", sim.phase(train));

    std::fs::create_dir_all("output/shuttle")?;
    let out = Path::new("output/shuttle/network.json");
    sim.world.save_file(out)?;
    println!("Network saved to {}", out.display());

    Ok(())
}
