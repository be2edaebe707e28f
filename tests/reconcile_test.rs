//! Reconciliation properties: idempotence, invariant preservation, and the
//! rewire behavior the editor relies on while a participant drags edges
//! between nodes.

mod common;

use common::{init_logging, wordcount_pipeline};
use proptest::prelude::*;
use sluice_core::{
    properties::{NodeId, NodeUpdate, Pipeline, Rules},
    reconcile::{build_update_params, reconcile_local},
};

#[test]
fn reconcile_is_idempotent() {
    init_logging();
    let pipeline = wordcount_pipeline();
    let id = NodeId::from("s1");

    let once = reconcile_local(&pipeline.rules, &id);
    let twice = reconcile_local(&once, &id);
    assert_eq!(once, twice);
}

#[test]
fn fan_out_to_other_nodes_is_preserved() {
    init_logging();
    let rules: Rules = [("t1", vec!["sA", "sB"])].into_iter().collect();

    let reconciled = reconcile_local(&rules, &"sA".into());

    let expected: Rules = [("t1", vec!["sB"])].into_iter().collect();
    assert_eq!(reconciled, expected);
}

#[test]
fn rewire_severs_stale_edge_before_merging() {
    init_logging();
    let pipeline = wordcount_pipeline();

    // Drag the sink from under t2 onto t1.
    let update = NodeUpdate::new("t1").with_to(vec!["w1", "s1"]);
    let params = build_update_params(&pipeline, Some(&update), Some(&NodeId::from("s1")));

    assert_eq!(params.rules.fan_in(&"s1".into()), 1);
    assert!(params.rules.downstream(&"t2".into()).is_empty());
    assert_eq!(
        params.rules.downstream(&"t1".into()),
        &[NodeId::from("w1"), NodeId::from("s1")]
    );
    // Objects travel through unchanged; only rules are rewritten.
    assert_eq!(params.objects, pipeline.objects);
}

#[test]
fn disconnect_only_edit_returns_reconciled_pipeline() {
    init_logging();
    let pipeline = wordcount_pipeline();

    let params = build_update_params(&pipeline, None, Some(&NodeId::from("w1")));

    assert_eq!(params.rules.fan_in(&"w1".into()), 0);
    // Every other route is untouched.
    assert_eq!(params.rules.downstream(&"t2".into()), &[NodeId::from("s1")]);
}

#[test]
fn repeated_rewires_converge() {
    init_logging();
    let mut pipeline = wordcount_pipeline();

    // A participant wires s1 back and forth between the two topics. The
    // map must always hold exactly one upstream edge for s1 afterwards.
    for topic in ["t1", "t2", "t1", "t1", "t2"] {
        let mut to: Vec<NodeId> = pipeline.rules.downstream(&topic.into()).to_vec();
        if !to.contains(&"s1".into()) {
            to.push("s1".into());
        }
        let update = NodeUpdate::new(topic).with_to(to.iter().map(NodeId::as_str).collect());
        pipeline = build_update_params(&pipeline, Some(&update), Some(&NodeId::from("s1")));
        assert_eq!(pipeline.rules.fan_in(&"s1".into()), 1);
    }
}

fn arb_rules() -> impl Strategy<Value = Rules> {
    proptest::collection::btree_map(
        0u8..10,
        proptest::collection::vec(0u8..10, 0..4),
        0..8,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(from, to)| {
                (
                    format!("n{from}"),
                    to.into_iter()
                        .map(|target| format!("n{target}"))
                        .collect::<Vec<String>>(),
                )
            })
            .collect::<Rules>()
    })
}

proptest! {
    #[test]
    fn prop_reconcile_idempotent(rules in arb_rules(), target in 0u8..10) {
        let target = NodeId::from(format!("n{target}"));
        let once = reconcile_local(&rules, &target);
        let twice = reconcile_local(&once, &target);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_reconcile_removes_every_occurrence(rules in arb_rules(), target in 0u8..10) {
        let target = NodeId::from(format!("n{target}"));
        let reconciled = reconcile_local(&rules, &target);
        prop_assert_eq!(reconciled.fan_in(&target), 0);
    }

    #[test]
    fn prop_reconcile_touches_only_the_target(rules in arb_rules(), target in 0u8..10) {
        let target = NodeId::from(format!("n{target}"));
        let reconciled = reconcile_local(&rules, &target);
        for other in (0u8..10).map(|n| NodeId::from(format!("n{n}"))) {
            if other != target {
                prop_assert_eq!(reconciled.fan_in(&other), rules.fan_in(&other));
            }
        }
    }

    #[test]
    fn prop_rewire_yields_single_upstream(rules in arb_rules(), target in 0u8..10) {
        let target = NodeId::from(format!("n{target}"));
        let pipeline = Pipeline { rules, ..Default::default() };

        let update = NodeUpdate::new("attached").with_to(vec![target.as_str()]);
        let params = build_update_params(&pipeline, Some(&update), Some(&target));

        prop_assert_eq!(params.rules.fan_in(&target), 1);
        prop_assert_eq!(params.rules.downstream(&"attached".into()), &[target.clone()]);
    }
}
