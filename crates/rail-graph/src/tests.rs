//! Unit tests for rail-graph.
//!
//! All tests use hand-built grids; no fixtures on disk.

#[cfg(test)]
mod helpers {
    use std::collections::HashSet;

    use rail_core::Node;

    use crate::{FootprintIndex, NetworkGraph};

    pub const SPEED: u32 = 80;

    pub fn s(x: i32, y: i32) -> Node {
        Node::surface(x, y)
    }

    /// Straight east-west line of `len` segments starting at `(x0, y)`.
    pub fn line(graph: &mut NetworkGraph, x0: i32, y: i32, len: i32) {
        for x in x0..x0 + len {
            graph.add_edge(s(x, y), s(x + 1, y), SPEED, 100).unwrap();
        }
    }

    /// A graph holding two short stubs so `a` and `b` exist as nodes.
    pub fn stubs(a: Node, b: Node) -> NetworkGraph {
        let mut g = NetworkGraph::new();
        g.add_edge(a, Node::new(a.x - 1, a.y, a.level), SPEED, 100).unwrap();
        g.add_edge(b, Node::new(b.x + 1, b.y, b.level), SPEED, 100).unwrap();
        g
    }

    /// Obstacle set standing in for station footprints.
    pub struct Blocked(pub HashSet<Node>);

    impl FootprintIndex for Blocked {
        fn is_within_any(&self, node: Node) -> bool {
            self.0.contains(&node)
        }
    }
}

// ── Edge identity ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod edge {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use proptest::prelude::*;
    use rail_core::{Direction, Node};

    use crate::Edge;

    fn hash_of(e: &Edge) -> u64 {
        let mut h = DefaultHasher::new();
        e.hash(&mut h);
        h.finish()
    }

    #[test]
    fn direction_of_view() {
        let e = Edge::new(Node::surface(0, 0), Node::surface(1, 1));
        assert_eq!(e.direction(), Direction::SE);
        assert_eq!(e.reversed().direction(), Direction::NW);
        assert!(!e.is_level_change());
    }

    #[test]
    fn other_endpoint() {
        let (a, b) = (Node::surface(0, 0), Node::surface(1, 0));
        let e = Edge::new(a, b);
        assert_eq!(e.other(a), Some(b));
        assert_eq!(e.other(b), Some(a));
        assert_eq!(e.other(Node::surface(5, 5)), None);
    }

    fn any_node() -> impl Strategy<Value = Node> {
        (-20i32..20, -20i32..20, 0i8..2).prop_map(|(x, y, l)| Node::new(x, y, l))
    }

    proptest! {
        #[test]
        fn canonical_in_both_orientations(a in any_node(), b in any_node()) {
            let ab = Edge::new(a, b);
            let ba = Edge::new(b, a);
            prop_assert_eq!(ab, ba);
            prop_assert_eq!(hash_of(&ab), hash_of(&ba));
            prop_assert_eq!(ab.reversed().reversed(), ab);
            prop_assert_eq!(ab.reversed().reversed().start, a);
            prop_assert_eq!(ab.canonical().key(), ba.canonical().key());
            prop_assert!(ab.canonical().start <= ab.canonical().end);
        }
    }
}

// ── Graph mutation & queries ──────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use rail_core::Node;

    use super::helpers::{line, s, SPEED};
    use crate::{AttrValue, Edge, EdgeData, GraphError, NetworkGraph};

    #[test]
    fn empty_graph() {
        let g = NetworkGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(matches!(g.neighbors(s(0, 0)), Err(GraphError::NodeNotFound(_))));
    }

    #[test]
    fn add_and_query() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 3);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbors(s(1, 0)).unwrap(), vec![s(0, 0), s(2, 0)]);
        assert_eq!(g.degree_at(s(0, 0)).unwrap(), 1);
        assert_eq!(g.degree_at(s(2, 0)).unwrap(), 2);
        assert_eq!(
            g.edge_data(&Edge::new(s(2, 0), s(1, 0))),
            Some(&EdgeData::new(SPEED, 100))
        );
    }

    #[test]
    fn self_loop_rejected() {
        let mut g = NetworkGraph::new();
        let err = g.add_edge(s(0, 0), s(0, 0), SPEED, 100).unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop(_)));
        assert!(err.is_invalid_topology());
        assert!(g.is_empty());
    }

    #[test]
    fn non_adjacent_rejected() {
        let mut g = NetworkGraph::new();
        assert!(matches!(
            g.add_edge(s(0, 0), s(2, 0), SPEED, 100),
            Err(GraphError::NotAdjacent { .. })
        ));
        // Tunnel and surface at the same x/y only join through a level link.
        assert!(g.add_edge(s(0, 0), Node::tunnel(1, 0), SPEED, 100).is_ok());
        assert!(matches!(
            g.add_edge(s(0, 0), Node::new(0, 0, 2), SPEED, 100),
            Err(GraphError::NotAdjacent { .. })
        ));
    }

    #[test]
    fn inconsistent_reinsert_rejected_identical_is_noop() {
        let mut g = NetworkGraph::new();
        g.add_edge(s(0, 0), s(1, 0), SPEED, 100).unwrap();
        assert!(g.add_edge(s(1, 0), s(0, 0), SPEED, 100).is_ok());
        assert!(matches!(
            g.add_edge(s(1, 0), s(0, 0), SPEED, 120),
            Err(GraphError::InconsistentEdge { .. })
        ));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_data(&Edge::new(s(0, 0), s(1, 0))).unwrap().length, 100);
    }

    #[test]
    fn tunnel_is_separate_from_surface() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        g.add_edge(Node::tunnel(0, 0), Node::tunnel(1, 0), SPEED, 100).unwrap();
        assert_eq!(g.neighbors(s(1, 0)).unwrap(), vec![s(0, 0), s(2, 0)]);
        assert_eq!(g.neighbors(Node::tunnel(1, 0)).unwrap(), vec![Node::tunnel(0, 0)]);
    }

    #[test]
    fn remove_edge_drops_isolated_nodes() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        g.set_node_attr(s(0, 0), "label", AttrValue::Text("buffer".into())).unwrap();
        g.remove_edge(&Edge::new(s(1, 0), s(0, 0))).unwrap();
        assert!(!g.has_node(s(0, 0)));
        assert!(g.get_node_attr(s(0, 0), "label").is_none());
        assert!(g.has_node(s(1, 0)));
        assert!(matches!(
            g.remove_edge(&Edge::new(s(0, 0), s(1, 0))),
            Err(GraphError::EdgeNotFound(_))
        ));
    }

    #[test]
    fn node_attributes() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 1);
        assert!(g.set_node_attr(s(5, 5), "x", AttrValue::Flag(true)).is_err());
        assert_eq!(g.set_node_attr(s(0, 0), "depth", AttrValue::Int(3)).unwrap(), None);
        assert_eq!(g.get_node_attr(s(0, 0), "depth"), Some(&AttrValue::Int(3)));
        let with: Vec<_> = g.all_nodes_with_attr("depth").map(|(n, _)| n).collect();
        assert_eq!(with, vec![s(0, 0)]);
        assert_eq!(g.remove_node_attr(s(0, 0), "depth").unwrap(), Some(AttrValue::Int(3)));
        assert_eq!(g.all_nodes_with_attr("depth").count(), 0);
    }

    #[test]
    fn all_edges_is_restartable_and_canonical() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 3);
        let first: Vec<Edge> = g.all_edges_with_data().map(|(e, _)| e).collect();
        let second: Vec<Edge> = g.all_edges_with_data().map(|(e, _)| e).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(first.iter().all(|e| e.start < e.end));
    }

    #[test]
    fn add_path_lengths_and_reuse() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 1);
        let path = [s(0, 0), s(1, 0), s(2, 1), s(3, 1)];
        let edges = g.add_path(&path, 60, 100).unwrap();
        assert_eq!(edges.len(), 3);
        // Existing segment keeps its attributes.
        assert_eq!(g.edge_data(&edges[0]).unwrap().speed, SPEED);
        assert_eq!(g.edge_data(&edges[1]).unwrap().length, 141);
        assert_eq!(g.edge_data(&edges[2]).unwrap(), &crate::EdgeData::new(60, 100));
    }

    #[test]
    fn add_path_is_all_or_nothing() {
        let mut g = NetworkGraph::new();
        let before = g.clone();
        assert!(g.add_path(&[s(0, 0), s(1, 0), s(3, 0)], 60, 100).is_err());
        assert_eq!(g, before);
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use rail_core::{Direction, Pose};

    use super::helpers::{line, s};
    use crate::{AttrValue, Edge, GraphError, NetworkGraph, SIGNAL_ATTR};

    #[test]
    fn place_and_query() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 3);
        let pose = Pose::new(s(1, 0), Direction::E);
        g.add_signal(pose).unwrap();
        g.add_signal(Pose::new(s(1, 0), Direction::W)).unwrap();
        assert!(g.has_signal(pose));
        assert_eq!(g.signals_at(s(1, 0)).count(), 2);
        assert_eq!(g.signals().count(), 2);
    }

    #[test]
    fn signal_attribute_is_reserved() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        // East-west track only: a north-facing signal would be invalid.
        let north = Pose::new(s(1, 0), Direction::N);
        let forged = AttrValue::Signals([Direction::N].into_iter().collect());
        assert!(matches!(
            g.set_node_attr(s(1, 0), SIGNAL_ATTR, forged),
            Err(GraphError::InvalidAttribute(_))
        ));
        assert!(!g.has_signal(north));

        let east = Pose::new(s(1, 0), Direction::E);
        g.add_signal(east).unwrap();
        assert!(matches!(
            g.remove_node_attr(s(1, 0), SIGNAL_ATTR),
            Err(GraphError::InvalidAttribute(_))
        ));
        assert!(g.has_signal(east));
        assert!(g.remove_signal(east));
        assert!(g.get_node_attr(s(1, 0), SIGNAL_ATTR).is_none());
    }

    #[test]
    fn duplicate_rejected() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        let pose = Pose::new(s(1, 0), Direction::E);
        g.add_signal(pose).unwrap();
        assert_eq!(g.add_signal(pose), Err(GraphError::DuplicateSignal(pose)));
    }

    #[test]
    fn signal_needs_track_along_facing() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        assert!(matches!(
            g.add_signal(Pose::new(s(1, 0), Direction::N)),
            Err(GraphError::InvalidSignal { .. })
        ));
        assert!(matches!(
            g.add_signal(Pose::new(s(1, 0), Direction::NONE)),
            Err(GraphError::InvalidSignal { .. })
        ));
        assert!(matches!(
            g.add_signal(Pose::new(s(9, 9), Direction::E)),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn removing_track_drops_unsupported_signals() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        g.add_edge(s(1, 0), s(1, 1), 80, 100).unwrap();
        let east = Pose::new(s(1, 0), Direction::E);
        let south = Pose::new(s(1, 0), Direction::S);
        g.add_signal(east).unwrap();
        g.add_signal(south).unwrap();
        g.remove_edge(&Edge::new(s(1, 0), s(1, 1))).unwrap();
        assert!(g.has_signal(east));
        assert!(!g.has_signal(south));
    }

    #[test]
    fn remove_signal() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        let pose = Pose::new(s(1, 0), Direction::E);
        g.add_signal(pose).unwrap();
        assert!(g.remove_signal(pose));
        assert!(!g.remove_signal(pose));
        assert_eq!(g.signals().count(), 0);
    }
}

// ── Archive ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod archive {
    use rail_core::{Direction, Node, Pose};

    use super::helpers::{line, s};
    use crate::{AttrValue, GraphError, NetworkGraph};

    #[test]
    fn roundtrip() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 4);
        g.add_edge(s(4, 0), Node::tunnel(5, 0), 40, 150).unwrap();
        g.add_signal(Pose::new(s(2, 0), Direction::E)).unwrap();
        g.set_node_attr(s(0, 0), "label", AttrValue::Text("west end".into())).unwrap();

        let restored = NetworkGraph::from_archive(g.to_archive()).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn mismatched_node_list_rejected() {
        let mut g = NetworkGraph::new();
        line(&mut g, 0, 0, 2);
        let mut archive = g.to_archive();
        archive.nodes.push(s(40, 40));
        assert!(matches!(
            NetworkGraph::from_archive(archive),
            Err(GraphError::MalformedArchive(_))
        ));
    }
}

// ── Pathfinder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pathfinder {
    use std::cmp::Reverse;
    use std::collections::{BinaryHeap, HashMap, HashSet};

    use proptest::prelude::*;
    use rail_core::{Direction, Node, PathfinderConfig, Pose};

    use super::helpers::{s, stubs, Blocked};
    use crate::{
        AStarPathfinder, Cost, GraphError, NetworkGraph, NoFootprints, Pathfinder, SearchContext,
    };

    fn assert_buildable(path: &[Node], start: Pose) {
        let mut arrived = start.direction;
        for w in path.windows(2) {
            let step = Direction::between(w[0], w[1]).expect("path steps are adjacent");
            assert!(arrived.allows_turn_to(step), "{arrived} -> {step} at {}", w[0]);
            arrived = step;
        }
    }

    #[test]
    fn straight_line() {
        let (a, b) = (s(0, 0), s(4, 0));
        let g = stubs(a, b);
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::new(a, Direction::E), Pose::at(b))
            .unwrap()
            .unwrap();
        assert_eq!(path, vec![s(0, 0), s(1, 0), s(2, 0), s(3, 0), s(4, 0)]);
    }

    #[test]
    fn golden_tie_break() {
        // Several paths cost 2 + √2; equal-f entries are served FIFO.
        let (a, b) = (s(0, 0), s(3, 1));
        let g = stubs(a, b);
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::at(a), Pose::at(b))
            .unwrap()
            .unwrap();
        assert_eq!(path, vec![s(0, 0), s(1, 0), s(2, 0), s(3, 1)]);
    }

    #[test]
    fn same_start_and_target() {
        let g = stubs(s(0, 0), s(5, 0));
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::at(s(0, 0)), Pose::at(s(0, 0)))
            .unwrap();
        assert_eq!(path, Some(vec![s(0, 0)]));
    }

    #[test]
    fn heading_forbids_doubling_back() {
        let (a, b) = (s(0, 0), s(0, 2));
        let g = stubs(a, b);
        let start = Pose::new(a, Direction::E);
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, start, Pose::at(b))
            .unwrap()
            .unwrap();
        assert_buildable(&path, start);
        assert!(Cost::of_path(&path).as_f64() > 2.0);
    }

    #[test]
    fn target_heading_is_honoured() {
        let (a, b) = (s(0, 0), s(5, 0));
        let g = stubs(a, b);
        let target = Pose::new(b, Direction::S);
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::new(a, Direction::E), target)
            .unwrap()
            .unwrap();
        let last = Direction::between(path[path.len() - 2], b).unwrap();
        assert!(last.allows_turn_to(Direction::S));
    }

    #[test]
    fn detours_around_footprints() {
        let (a, b) = (s(0, 0), s(6, 0));
        let g = stubs(a, b);
        let wall = Blocked((-1..=1).map(|y| s(3, y)).collect());
        let path = AStarPathfinder::default()
            .find_path(&g, &wall, Pose::new(a, Direction::E), Pose::at(b))
            .unwrap()
            .unwrap();
        assert!(path.iter().all(|n| !wall.0.contains(n)));
        assert!(Cost::of_path(&path).as_f64() > 6.0);
    }

    #[test]
    fn no_path_is_none_not_error() {
        let (a, b) = (s(0, 0), s(6, 0));
        let g = stubs(a, b);
        // Ring of blocked cells around the target.
        let ring: HashSet<Node> = Direction::ALL.iter().map(|&d| b.offset(d)).collect();
        let config = PathfinderConfig { search_margin: 4, ..PathfinderConfig::default() };
        let result = AStarPathfinder::new(config)
            .find_path(&g, &Blocked(ring), Pose::at(a), Pose::at(b))
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn incompatible_signal_is_an_obstacle() {
        let (a, b) = (s(0, 0), s(4, 0));
        let mut g = stubs(a, b);
        // Track crossing the straight line north-south at x = 2, signalled southwards.
        g.add_edge(s(2, -1), s(2, 0), 80, 100).unwrap();
        g.add_edge(s(2, 0), s(2, 1), 80, 100).unwrap();
        g.add_signal(Pose::new(s(2, 0), Direction::S)).unwrap();
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::new(a, Direction::E), Pose::at(b))
            .unwrap()
            .unwrap();
        assert!(!path.contains(&s(2, 0)));

        // A signal facing along the travel axis does not block.
        let mut g = stubs(a, b);
        g.add_edge(s(1, 0), s(2, 0), 80, 100).unwrap();
        g.add_signal(Pose::new(s(2, 0), Direction::W)).unwrap();
        let path = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::new(a, Direction::E), Pose::at(b))
            .unwrap()
            .unwrap();
        assert!(path.contains(&s(2, 0)));
    }

    #[test]
    fn stays_on_start_level() {
        let (a, b) = (Node::tunnel(0, 0), Node::tunnel(5, 2));
        let g = stubs(a, b);
        // Surface footprints do not block the tunnel level.
        let above = Blocked((0..6).flat_map(|x| (0..3).map(move |y| s(x, y))).collect());
        let path = AStarPathfinder::default()
            .find_path(&g, &above, Pose::at(a), Pose::at(b))
            .unwrap()
            .unwrap();
        assert!(path.iter().all(|n| n.level == Node::TUNNEL));
    }

    #[test]
    fn absent_endpoint_is_invalid_argument() {
        let g = stubs(s(0, 0), s(5, 0));
        let err = AStarPathfinder::default()
            .find_path(&g, &NoFootprints, Pose::at(s(0, 0)), Pose::at(s(9, 9)))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));

        let mut g = g;
        g.add_edge(Node::tunnel(5, 0), Node::tunnel(6, 0), 80, 100).unwrap();
        assert!(matches!(
            AStarPathfinder::default().find_path(
                &g,
                &NoFootprints,
                Pose::at(s(0, 0)),
                Pose::at(Node::tunnel(5, 0))
            ),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn cost_ordering_is_exact() {
        let three = Cost { axis: 3, diagonal: 0 };
        let two_diag = Cost { axis: 0, diagonal: 2 }; // 2.828
        let one_one = Cost { axis: 1, diagonal: 1 }; // 2.414
        assert!(two_diag < three);
        assert!(one_one < two_diag);
        assert!(Cost { axis: 2, diagonal: 1 } > Cost { axis: 0, diagonal: 2 });
        assert_eq!(Cost { axis: 2, diagonal: 1 }, Cost { axis: 2, diagonal: 1 });
    }

    // ── Property tests ────────────────────────────────────────────────────

    /// Exhaustive Dijkstra over the same state space, for comparison.
    fn brute_force(ctx: &SearchContext<'_>) -> Option<Cost> {
        let start = (ctx.start.node, ctx.start.direction);
        let mut dist: HashMap<(Node, Direction), Cost> = HashMap::new();
        let mut heap = BinaryHeap::new();
        dist.insert(start, Cost::ZERO);
        heap.push(Reverse((Cost::ZERO, start)));
        while let Some(Reverse((cost, state))) = heap.pop() {
            if dist.get(&state).is_some_and(|&d| d < cost) {
                continue;
            }
            if state != start && ctx.is_goal(state.0, state.1) {
                return Some(cost);
            }
            for (next, step) in ctx.successors(state.0, state.1) {
                let nc = cost.plus(Cost::of_step(step));
                if dist.get(&(next, step)).is_none_or(|&d| nc < d) {
                    dist.insert((next, step), nc);
                    heap.push(Reverse((nc, (next, step))));
                }
            }
        }
        None
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        (0usize..9).prop_map(|i| if i == 8 { Direction::NONE } else { Direction::ALL[i] })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn successors_follow_valid_turns(arrived in any_direction()) {
            let (a, b) = (s(0, 0), s(10, 10));
            let g = stubs(a, b);
            let config = PathfinderConfig::default();
            let ctx = SearchContext::new(&g, &NoFootprints, Pose::at(a), Pose::at(b), &config);
            let here = s(5, 5);
            let steps: HashSet<Direction> = ctx.successors(here, arrived).map(|(_, d)| d).collect();
            for d in Direction::ALL {
                prop_assert_eq!(steps.contains(&d), arrived.valid_turns().contains(&d));
            }
        }

        #[test]
        fn astar_matches_brute_force(
            tx in 0i32..6,
            ty in 0i32..6,
            heading in any_direction(),
            walls in proptest::collection::hash_set((-2i32..8, -2i32..8), 0..18),
        ) {
            prop_assume!((tx, ty) != (0, 0));
            let (a, b) = (s(0, 0), s(tx, ty));
            let g = stubs(a, b);
            let blocked = Blocked(walls.into_iter().map(|(x, y)| s(x, y)).collect());
            let config = PathfinderConfig { search_margin: 2, ..PathfinderConfig::default() };
            let start = Pose::new(a, heading);
            let target = Pose::at(b);

            let found = AStarPathfinder::new(config.clone())
                .find_path(&g, &blocked, start, target)
                .unwrap();
            let ctx = SearchContext::new(&g, &blocked, start, target, &config);
            let best = brute_force(&ctx);

            prop_assert_eq!(found.as_ref().map(|p| Cost::of_path(p)), best);
            if let Some(path) = found {
                assert_buildable(&path, start);
                prop_assert_eq!(path.first(), Some(&a));
                prop_assert_eq!(path.last(), Some(&b));
            }
        }

        #[test]
        fn repeated_searches_return_identical_paths(
            tx in -6i32..6,
            ty in -6i32..6,
            heading in any_direction(),
        ) {
            prop_assume!((tx, ty) != (0, 0));
            let (a, b) = (s(0, 0), s(tx, ty));
            let g: NetworkGraph = stubs(a, b);
            let finder = AStarPathfinder::default();
            let first = finder.find_path(&g, &NoFootprints, Pose::new(a, heading), Pose::at(b)).unwrap();
            let second = finder.find_path(&g, &NoFootprints, Pose::new(a, heading), Pose::at(b)).unwrap();
            prop_assert!(first.is_some());
            prop_assert_eq!(first, second);
        }
    }
}
