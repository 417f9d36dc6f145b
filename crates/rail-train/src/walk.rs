//! Walking along track in a direction of travel.
//!
//! A train can only leave an edge's end node onto a segment its heading may
//! turn into ([`rail_core::Direction::valid_turns`]).  Level-change links carry no
//! planar heading, so they may be entered from any heading and left onto
//! any segment except the one just used.
//!
//! There are no switch states in the model: where several continuations are
//! valid, the first one in node order is taken, which keeps every walk
//! deterministic.

use rail_graph::{Edge, NetworkGraph};

use crate::{TrainError, TrainResult};

/// Valid continuations of `edge` beyond its end node, in node order.
pub fn continuations<'g>(graph: &'g NetworkGraph, edge: Edge) -> impl Iterator<Item = Edge> + 'g {
    let heading = edge.direction();
    graph
        .edges_at(edge.end)
        .map(|(next, _)| next)
        .filter(move |next| next.end != edge.start)
        .filter(move |next| {
            let step = next.direction();
            heading.is_none() || step.is_none() || heading.allows_turn_to(step)
        })
}

/// The continuation a train takes after `edge`.
pub fn next_edge(graph: &NetworkGraph, edge: Edge) -> Option<Edge> {
    continuations(graph, edge).next()
}

/// Length of `edge` in metres.
pub fn edge_length(graph: &NetworkGraph, edge: &Edge) -> TrainResult<u32> {
    graph
        .edge_data(edge)
        .map(|data| data.length)
        .ok_or(TrainError::EdgeNotInGraph(*edge))
}

/// Speed limit of `edge`.
pub fn edge_speed(graph: &NetworkGraph, edge: &Edge) -> TrainResult<u32> {
    graph
        .edge_data(edge)
        .map(|data| data.speed)
        .ok_or(TrainError::EdgeNotInGraph(*edge))
}

/// `true` if `run` is a connected sequence: each edge starts where the
/// previous one ends.
pub fn is_connected_run(run: &[Edge]) -> bool {
    run.windows(2).all(|w| w[0].end == w[1].start)
}

