use fourcolor::algorithms::boundary::walk_outer;
use fourcolor::{Engine, EngineError};

#[test]
fn fixed_pair_alone_is_boundary() {
    let e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    assert_eq!(e.is_enclosed(a), Some(false));
    assert_eq!(e.is_enclosed(b), Some(false));
    let walk = walk_outer(e.store()).unwrap();
    assert_eq!(walk.steps.len(), 2);
    assert_eq!(walk.steps[0].0, a);
}

#[test]
fn triangle_with_anchors_is_all_boundary() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(300.0, 300.0, &[a, b]).unwrap();
    for n in [a, b, c] {
        assert_eq!(e.is_enclosed(n), Some(false));
    }
    // the walk closes on the starting directed edge
    let walk = walk_outer(e.store()).unwrap();
    assert_eq!(walk.steps.len(), 3);
}

#[test]
fn node_placed_inside_is_rejected_and_rolled_back() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(300.0, 300.0, &[a, b]).unwrap();
    let ver = e.version();
    let edges = e.edge_ids();
    let ordered_c = e.ordered_connections(c).unwrap().to_vec();

    // pendant off C, but inside triangle A-B-C
    let err = e.create_node(150.0, 150.0, &[c]).unwrap_err();
    assert!(matches!(err, EngineError::PlacementEnclosed { .. }));
    assert_eq!(e.version(), ver);
    assert_eq!(e.node_count(), 3);
    assert_eq!(e.edge_ids(), edges);
    assert_eq!(e.ordered_connections(c).unwrap(), ordered_c.as_slice());
    assert_eq!(e.active(), Some(c));

    // ids of rejected placements are not handed out again
    let d = e.create_node(500.0, 300.0, &[c]).unwrap();
    assert_eq!(d, 4);
}

#[test]
fn interior_nodes_cannot_be_neighbors() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(120.0, 120.0, &[a, b]).unwrap();
    let d = e.create_node(400.0, 400.0, &[a, b, c]).unwrap();
    assert_eq!(e.is_enclosed(c), Some(true));
    let ver = e.version();
    let err = e.create_node(600.0, 400.0, &[d, c]).unwrap_err();
    assert_eq!(err, EngineError::EnclosedNeighbor { id: c });
    assert_eq!(e.version(), ver);
    assert_eq!(e.node_count(), 4);
}

#[test]
fn pendant_chain_stays_on_boundary() {
    let mut e = Engine::new();
    let (_, b) = e.anchors().unwrap();
    let c = e.create_node(200.0, 40.0, &[b]).unwrap();
    let d = e.create_node(320.0, 60.0, &[c]).unwrap();
    for n in e.node_ids() {
        assert_eq!(e.is_enclosed(n), Some(false));
    }
    // bridges are walked in both directions
    let walk = walk_outer(e.store()).unwrap();
    assert_eq!(walk.steps.len(), 2 * e.edge_count());
    assert!(walk.boundary.contains(&d));
}

#[test]
fn bending_a_pendant_edge_turns_its_entry_angle() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(300.0, 300.0, &[a, b]).unwrap();
    e.finalize();
    let d = e.create_node(500.0, 500.0, &[c]).unwrap();
    assert_eq!(e.is_enclosed(c), Some(false));
    // control point at (420, 100): the edge now leaves C heading north
    let cd = e.store().edge_between(c, d).unwrap();
    e.adjust_curvature(cd, 20.0, -300.0).unwrap();
    assert!(e.entry_angle(c, cd).unwrap() < 45.0 || e.entry_angle(c, cd).unwrap() > 315.0);
    // still a pendant, the walk reaches both ends
    assert_eq!(e.is_enclosed(d), Some(false));
    assert!(e.drain_diagnostics().is_empty());
}

#[test]
fn nodes_behind_the_anchor_edge_are_rejected() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(300.0, 300.0, &[a, b]).unwrap();
    e.finalize();
    let ver = e.version();

    // outside the protected zone, but on the far side of A->B
    let err = e.create_node(100.0, -200.0, &[a, b]).unwrap_err();
    assert_eq!(err, EngineError::BehindAnchors { x: 100.0, y: -200.0 });
    assert_eq!(e.version(), ver);
    assert_eq!(e.node_count(), 3);
    for n in [a, b, c] {
        assert_eq!(e.is_enclosed(n), Some(false));
    }

    // right of the line even with a negative y
    let d = e.create_node(300.0, -200.0, &[b]).unwrap();
    assert_eq!(e.is_enclosed(d), Some(false));
    assert_eq!(e.is_enclosed(c), Some(false));
}

#[test]
fn moves_and_bends_cannot_cross_the_anchor_edge() {
    let mut e = Engine::new();
    let (a, b) = e.anchors().unwrap();
    let c = e.create_node(300.0, 300.0, &[a, b]).unwrap();
    let ver = e.version();
    assert!(matches!(
        e.move_node(c, -300.0, 100.0),
        Err(EngineError::BehindAnchors { .. })
    ));
    // C itself stays put, but the edge C-A would bow behind A
    let ca = e.store().edge_between(c, a).unwrap();
    assert!(matches!(
        e.adjust_curvature(ca, -400.0, -400.0),
        Err(EngineError::BehindAnchors { .. })
    ));
    assert_eq!(e.version(), ver);
    assert_eq!(e.position(c).map(|p| (p.x, p.y)), Some((300.0, 300.0)));

    // a bent edge also blocks moves that would drag its control point across
    e.adjust_curvature(ca, -100.0, -100.0).unwrap();
    assert!(matches!(
        e.move_node(c, 200.0, 150.0),
        Err(EngineError::BehindAnchors { .. })
    ));
    for n in [a, b, c] {
        assert_eq!(e.is_enclosed(n), Some(false));
    }
}
