//! Unit tests for rail-station.

#[cfg(test)]
mod helpers {
    use rail_core::Node;
    use rail_graph::{Edge, NetworkGraph};

    use crate::Platform;

    pub fn s(x: i32, y: i32) -> Node {
        Node::surface(x, y)
    }

    pub fn e(a: (i32, i32), b: (i32, i32)) -> Edge {
        Edge::new(s(a.0, a.1), s(b.0, b.1))
    }

    /// East-west line from x = -10 to x = 10 at y = 0.
    pub fn line_graph() -> NetworkGraph {
        let mut g = NetworkGraph::new();
        for x in -10..10 {
            g.add_edge(s(x, 0), s(x + 1, 0), 80, 100).unwrap();
        }
        g
    }

    pub fn platform(xs: std::ops::Range<i32>) -> Platform {
        xs.map(|x| e((x, 0), (x + 1, 0))).collect()
    }
}

// ── Platform value type ───────────────────────────────────────────────────────

#[cfg(test)]
mod platform {
    use super::helpers::{e, platform};
    use crate::Platform;

    #[test]
    fn orientation_does_not_matter() {
        let a = Platform::new([e((0, 0), (1, 0)), e((1, 0), (2, 0))]);
        let b = Platform::new([e((2, 0), (1, 0)), e((1, 0), (0, 0))]);
        assert_eq!(a, b);
        assert!(a.contains(&e((1, 0), (0, 0))));
        assert!(a.edges().all(|edge| edge.start < edge.end));
    }

    #[test]
    fn intersects() {
        assert!(platform(0..3).intersects(&platform(2..5)));
        assert!(!platform(0..3).intersects(&platform(3..5)));
    }
}

// ── Footprints & overlap ──────────────────────────────────────────────────────

#[cfg(test)]
mod footprint {
    use proptest::prelude::*;
    use rail_core::{NetworkConfig, Node, StationId};

    use super::helpers::s;
    use crate::{Station, StationError, StationRepository};

    fn repo_with(anchor: Node) -> StationRepository {
        let mut repo = StationRepository::default();
        repo.create("Central", anchor, Vec::new(), None).unwrap();
        repo
    }

    #[test]
    fn default_footprint_is_five_by_three() {
        let repo = repo_with(s(0, 0));
        assert!(repo.is_within_any(s(0, 0)));
        assert!(repo.is_within_any(s(2, 1)));
        assert!(repo.is_within_any(s(-2, -1)));
        assert!(!repo.is_within_any(s(3, 0)));
        assert!(!repo.is_within_any(s(0, 2)));
    }

    #[test]
    fn footprint_is_per_level() {
        let repo = repo_with(s(0, 0));
        assert!(!repo.is_within_any(Node::tunnel(0, 0)));
        assert_eq!(repo.overlaps(Node::tunnel(0, 0)), None);
    }

    #[test]
    fn get_by_node() {
        let repo = repo_with(s(10, 10));
        assert_eq!(repo.get_by_node(s(11, 10)).map(|st| st.name.as_str()), Some("Central"));
        assert!(repo.get_by_node(s(0, 0)).is_none());
    }

    #[test]
    fn overlap_boundary() {
        let repo = repo_with(s(0, 0));
        // width 4 → |Δx| < 5 overlaps; height 2 → |Δy| < 3 overlaps.
        assert_eq!(repo.overlaps(s(4, 2)), Some(StationId(0)));
        assert_eq!(repo.overlaps(s(-4, -2)), Some(StationId(0)));
        assert_eq!(repo.overlaps(s(5, 0)), None);
        assert_eq!(repo.overlaps(s(0, 3)), None);
    }

    #[test]
    fn overlapping_add_is_rejected_and_repo_unchanged() {
        let mut repo = repo_with(s(0, 0));
        let err = repo.add(Station::new(StationId(7), "Annex", s(3, 1)), None).unwrap_err();
        assert_eq!(err, StationError::Overlap { anchor: s(3, 1), other: StationId(0) });
        assert!(err.is_invalid_topology());
        assert_eq!(repo.len(), 1);
        assert!(!repo.is_within_any(s(5, 1)));
    }

    #[test]
    fn custom_footprint() {
        let config = NetworkConfig { station_width: 2, station_height: 0, ..NetworkConfig::default() };
        let mut repo = StationRepository::new(&config);
        repo.create("Halt", s(0, 0), Vec::new(), None).unwrap();
        assert!(repo.is_within_any(s(1, 0)));
        assert!(!repo.is_within_any(s(0, 1)));
        assert!(repo.create("Next", s(3, 0), Vec::new(), None).is_ok());
    }

    #[test]
    fn removed_station_frees_its_footprint() {
        let mut repo = repo_with(s(0, 0));
        repo.remove(StationId(0)).unwrap();
        assert!(!repo.is_within_any(s(0, 0)));
        assert!(repo.create("Again", s(1, 0), Vec::new(), None).is_ok());
        assert!(matches!(repo.remove(StationId(0)), Err(StationError::NotFound(_))));
    }

    proptest! {
        #[test]
        fn overlap_matches_box_rule(dx in -8i32..8, dy in -8i32..8) {
            let repo = repo_with(s(0, 0));
            let expected = dx.abs() < 5 && dy.abs() < 3;
            prop_assert_eq!(repo.overlaps(s(dx, dy)).is_some(), expected);
        }

        #[test]
        fn within_matches_half_extents(dx in -5i32..5, dy in -5i32..5) {
            let repo = repo_with(s(0, 0));
            prop_assert_eq!(repo.is_within_any(s(dx, dy)), dx.abs() <= 2 && dy.abs() <= 1);
        }
    }
}

// ── Platforms in the repository ───────────────────────────────────────────────

#[cfg(test)]
mod platforms {
    use rail_core::StationId;

    use super::helpers::{e, line_graph, platform, s};
    use crate::{Platform, Station, StationError, StationRepository};

    #[test]
    fn platform_queries() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        let id = repo.create("West", s(-6, 1), vec![platform(-8..-5)], Some(&g)).unwrap();

        let edge = e((-6, 0), (-7, 0));
        assert!(repo.is_edge_platform(&edge));
        assert_eq!(repo.station_at_edge(&edge), Some(id));
        assert_eq!(repo.get_platform_from_edge(&edge), Some(&platform(-8..-5)));
        assert!(!repo.is_edge_platform(&e((0, 0), (1, 0))));
        assert!(repo.get_platform_from_edge(&e((0, 0), (1, 0))).is_none());
    }

    #[test]
    fn platform_shared_between_stations_rejected() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        repo.create("West", s(-6, 1), vec![platform(-8..-5)], Some(&g)).unwrap();
        let err = repo.create("East", s(0, 1), vec![platform(-6..0)], Some(&g)).unwrap_err();
        assert!(matches!(err, StationError::PlatformConflict { station: StationId(0), .. }));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn platforms_of_one_station_must_be_disjoint() {
        let mut repo = StationRepository::default();
        let station = Station::new(StationId(0), "Twin", s(0, 1))
            .with_platforms([platform(0..2), platform(1..3)]);
        let err = repo.add(station, None).unwrap_err();
        assert_eq!(
            err,
            StationError::PlatformConflict { edge: e((1, 0), (2, 0)), station: StationId(0) }
        );
    }

    #[test]
    fn platform_edges_must_be_track() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        let off_track = Platform::new([e((0, 5), (1, 5))]);
        assert_eq!(
            repo.create("Nowhere", s(0, 6), vec![off_track.clone()], Some(&g)),
            Err(StationError::EdgeNotInGraph(e((0, 5), (1, 5))))
        );
        // Without a graph there is nothing to check against.
        assert!(repo.create("Nowhere", s(0, 6), vec![off_track], None).is_ok());
    }

    #[test]
    fn add_and_remove_platform() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        let id = repo.create("Mid", s(0, 1), vec![platform(-2..0)], Some(&g)).unwrap();

        repo.add_platform(id, platform(0..2), Some(&g)).unwrap();
        assert_eq!(repo.get(id).unwrap().platforms.len(), 2);
        assert!(matches!(
            repo.add_platform(id, platform(1..3), Some(&g)),
            Err(StationError::PlatformConflict { .. })
        ));
        assert_eq!(repo.add_platform(id, Platform::default(), None), Err(StationError::EmptyPlatform));

        let removed = repo.remove_platform(id, &e((1, 0), (0, 0))).unwrap();
        assert_eq!(removed, platform(0..2));
        assert!(!repo.is_edge_platform(&e((0, 0), (1, 0))));
        assert!(matches!(
            repo.remove_platform(id, &e((0, 0), (1, 0))),
            Err(StationError::NoSuchPlatform { .. })
        ));
    }

    #[test]
    fn removing_station_strips_platforms() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        let id = repo.create("Mid", s(0, 1), vec![platform(-2..2)], Some(&g)).unwrap();
        let station = repo.remove(id).unwrap();
        assert_eq!(station.platforms.len(), 1);
        assert!(!repo.is_edge_platform(&e((0, 0), (1, 0))));
    }
}

// ── Archive ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod archive {
    use rail_core::{NetworkConfig, Node, StationId};

    use super::helpers::{line_graph, platform, s};
    use crate::{Station, StationError, StationRepository};

    #[test]
    fn roundtrip_preserves_ids_and_platforms() {
        let g = line_graph();
        let mut repo = StationRepository::default();
        repo.create("West", s(-7, 1), vec![platform(-9..-6), platform(-6..-5)], Some(&g)).unwrap();
        repo.create("East", s(7, 1), vec![platform(5..9)], Some(&g)).unwrap();
        repo.create("Deep", Node::tunnel(7, 1), Vec::new(), None).unwrap();
        repo.remove(StationId(0)).unwrap();

        let restored =
            StationRepository::from_archive(repo.to_archive(), &NetworkConfig::default(), Some(&g))
                .unwrap();
        assert_eq!(restored, repo);
        assert!(restored.is_edge_platform(&platform(5..9).edges().next().unwrap()));
        assert_eq!(restored.next_id(), StationId(3));
    }

    #[test]
    fn overlapping_archive_rejected() {
        let stations = vec![
            Station::new(StationId(0), "A", s(0, 0)),
            Station::new(StationId(1), "B", s(1, 1)),
        ];
        assert!(matches!(
            StationRepository::from_archive(stations, &NetworkConfig::default(), None),
            Err(StationError::Overlap { .. })
        ));
    }
}
