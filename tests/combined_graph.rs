//! End-to-end `CombinedGraph` scenarios.

mod common;

use aletsch_core::{BridgePath, PereadCluster};
use common::graph_with;
use test_case::test_case;

#[test]
fn singleton_cluster_builds_expected_splice_graph() {
    // Scenario 1: regions [100,200), [300,400), junction [200,300) w=5 c=1,
    // sbounds {100: (3,1)}, tbounds {400: (3,1)}.
    let g = graph_with(
        "chr1",
        '+',
        &[(100, 200, 0.0, 0), (300, 400, 0.0, 0)],
        &[(200, 300, 5.0, 1)],
        &[(100, 3.0, 1)],
        &[(400, 3.0, 1)],
    );

    let (sg, report) = g.build_splice_graph();
    assert_eq!(report.total_junctions, 1);
    assert_eq!(report.dropped_junctions, 0);

    assert_eq!(sg.vertex_count(), 4);
    let sink = sg.sink();
    assert_eq!(sink, 3);

    let edge_weight = |v, t| sg.out_iter(v).find(|&(to, _)| to == t).map(|(_, e)| e.weight);
    assert_eq!(edge_weight(0, 1), Some(3.0));
    assert_eq!(edge_weight(1, 2), Some(5.0));
    assert_eq!(edge_weight(2, sink), Some(3.0));
    // No continuation edge: rpos(100,200)=200 is not adjacent to lpos(300,400)=300.
    assert_eq!(sg.out_degree(1), 1);
}

#[test]
fn two_adjacent_regions_get_a_continuation_edge() {
    // Scenario 2: regions [100,200), [200,300), no junction across.
    let g = graph_with(
        "chr1",
        '+',
        &[(100, 200, 4.0, 1), (200, 300, 6.0, 1)],
        &[],
        &[(100, 1.0, 1)],
        &[(300, 1.0, 1)],
    );

    let (sg, report) = g.build_splice_graph();
    assert_eq!(report.total_junctions, 0);

    // v1's out-degree (1) is not larger than v2's in-degree (1); either
    // floor-1 weight selection picks the smaller side's region weight.
    let edge = sg.out_iter(1).find(|&(to, _)| to == 2);
    assert!(edge.is_some(), "expected a continuation edge between adjacent regions");
    assert!(edge.unwrap().1.weight >= 1.0);
}

#[test_case(
    [0, 100, 200, 0], 4, vec![],
    vec![(100, 200, 4.0)], vec![]
    ; "empty chain adds one region and no junction"
)]
#[test_case(
    [0, 100, 500, 0], 2, vec![150, 200, 300, 400],
    vec![(100, 150, 2.0), (200, 300, 2.0), (400, 500, 2.0)],
    vec![(150, 200, 2.0), (300, 400, 2.0)]
    ; "non-empty chain adds three regions and two junctions"
)]
fn append_matches_expected_regions_and_junctions(
    extend: [i32; 4],
    count: u32,
    chain: Vec<i32>,
    expected_regions: Vec<(i32, i32, f64)>,
    expected_junctions: Vec<(i32, i32, f64)>,
) {
    let mut g = graph_with("chr1", '+', &[], &[], &[], &[]);
    let pc = PereadCluster::new(extend, count, vec![], vec![], vec![]);
    let bp = BridgePath::bridged(chain);

    g.append(&pc, &bp);

    let regions: Vec<(i32, i32, f64)> = g
        .regions
        .iter()
        .map(|(iv, wc)| (iv.l, iv.r, wc.weight))
        .collect();
    assert_eq!(regions, expected_regions);

    let junctions: Vec<(i32, i32, f64)> = g
        .junctions
        .iter()
        .map(|(iv, wc)| (iv.l, iv.r, wc.weight))
        .collect();
    assert_eq!(junctions, expected_junctions);
}
