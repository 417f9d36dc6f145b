//! CSV route loader.
//!
//! # CSV format
//!
//! One row per stop, in stop order.  All rows of the same route must share
//! its `name`, `frequency_secs`, `first_train` and `last_train`.  Times of
//! day are `HH:MM:SS`.
//!
//! ```csv
//! route_id,name,station_id,travel_secs,dwell_secs,frequency_secs,first_train,last_train
//! 0,Harbour Line,0,0,0,900,06:00:00,22:00:00
//! 0,Harbour Line,1,120,30,900,06:00:00,22:00:00
//! 0,Harbour Line,2,180,0,900,06:00:00,22:00:00
//! ```
//!
//! The first row's `travel_secs`/`dwell_secs` of each route are ignored,
//! as is the last row's `dwell_secs`.  Every loaded route is validated.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use rail_core::{Duration, RouteId, StationId, Time};

use crate::route::{Route, RouteStop};
use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    route_id:       u32,
    name:           String,
    station_id:     u32,
    travel_secs:    u32,
    dwell_secs:     u32,
    frequency_secs: u32,
    first_train:    String,
    last_train:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load routes from a CSV file, in route-id order.
pub fn load_routes_csv(path: &Path) -> Result<Vec<Route>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> Result<Vec<Route>, ScheduleError> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_route: BTreeMap<u32, Vec<RouteRecord>> = BTreeMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        by_route.entry(row.route_id).or_default().push(row);
    }

    // ── Build one Route per route_id ──────────────────────────────────────
    let mut routes = Vec::with_capacity(by_route.len());
    for (id, rows) in by_route {
        let route = build_route(RouteId(id), rows)?;
        route.validate()?;
        routes.push(route);
    }
    info!("loaded {} routes", routes.len());
    Ok(routes)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_route(id: RouteId, rows: Vec<RouteRecord>) -> Result<Route, ScheduleError> {
    let Some(head) = rows.first() else {
        return Err(ScheduleError::TooFewStops { route: id, stops: 0 });
    };
    let name = head.name.clone();
    let frequency_secs = head.frequency_secs;
    let first_train = Time::parse(&head.first_train)?;
    let last_train = Time::parse(&head.last_train)?;

    let mut stops = Vec::with_capacity(rows.len());
    for row in &rows {
        if row.name != name
            || row.frequency_secs != frequency_secs
            || Time::parse(&row.first_train)? != first_train
            || Time::parse(&row.last_train)? != last_train
        {
            return Err(ScheduleError::Parse(format!(
                "rows of {id} disagree on name, frequency or train-of-day bounds"
            )));
        }
        stops.push(RouteStop::new(
            StationId(row.station_id),
            Duration::from_secs(row.travel_secs),
            Duration::from_secs(row.dwell_secs),
        ));
    }
    Ok(Route::new(id, name, stops, Duration::from_secs(frequency_secs), first_train, last_train))
}
