//! Order-independence and associativity of `IntervalAggregator`, the
//! sweep primitive `CombinedGraph::combine` is built on.

use aletsch_core::{Interval, IntervalAggregator};
use proptest::prelude::*;

fn collect(ops: &[(i32, i32, f64)]) -> Vec<(Interval, f64)> {
    let mut agg = IntervalAggregator::new();
    for &(l, r, w) in ops {
        agg.add(Interval::new(l, r), w);
    }
    agg.iter().collect()
}

#[test]
fn disjoint_intervals_stay_separate() {
    let out = collect(&[(0, 10, 1.0), (20, 30, 2.0)]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].1, 1.0);
    assert_eq!(out[1].1, 2.0);
}

#[test]
fn overlapping_intervals_sum_weights_on_the_overlap() {
    let out = collect(&[(0, 10, 1.0), (5, 15, 1.0)]);
    // [0,5) w=1, [5,10) w=2, [10,15) w=1
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], (Interval::new(0, 5), 1.0));
    assert_eq!(out[1], (Interval::new(5, 10), 2.0));
    assert_eq!(out[2], (Interval::new(10, 15), 1.0));
}

proptest! {
    #[test]
    fn insertion_order_does_not_affect_result(
        mut ops in prop::collection::vec(
            (0i32..200, 1i32..50, 0.0f64..5.0), 0..12
        )
    ) {
        let forward: Vec<(i32, i32, f64)> = ops
            .iter()
            .map(|&(l, len, w)| (l, l + len, w))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        ops.clear();

        let a = collect(&forward);
        let b = collect(&reversed);
        prop_assert_eq!(a, b);
    }
}
