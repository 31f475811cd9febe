// SPDX-License-Identifier: MIT

use super::*;
use hf_core::test_support::online_agent;
use proptest::prelude::*;

#[test]
fn single_agent_gets_the_entire_wordlist() {
    let agents = vec![online_agent("a1", hf_core::Capability::Gpu, 1000)];
    let ordered = order_by_weight(agents);
    let plan = ranges(100, &ordered);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].1.skip, 0);
    assert_eq!(plan[0].1.limit, 100);
}

#[test]
fn empty_wordlist_gives_every_agent_a_zero_limit() {
    let agents = vec![
        online_agent("a1", hf_core::Capability::Gpu, 1000),
        online_agent("a2", hf_core::Capability::Cpu, 500),
    ];
    let ordered = order_by_weight(agents);
    let plan = ranges(0, &ordered);
    assert!(plan.iter().all(|(_, r)| r.skip == 0 && r.limit == 0));
}

#[test]
fn three_agents_split_proportional_to_speed() {
    let agents = vec![
        online_agent("a", hf_core::Capability::Gpu, 2000),
        online_agent("b", hf_core::Capability::Gpu, 1000),
        online_agent("c", hf_core::Capability::Gpu, 1000),
    ];
    let ordered = order_by_weight(agents);
    let plan = ranges(100, &ordered);
    let by_id: std::collections::HashMap<_, _> = plan.into_iter().collect();
    let a = by_id.values().find(|r| r.limit == 50).unwrap();
    assert_eq!(a.skip, 0);
    let halves: Vec<_> = by_id.values().filter(|r| r.limit == 25).collect();
    assert_eq!(halves.len(), 2);
}

#[test]
fn zero_speed_agent_falls_back_to_capability_weight() {
    let agents = vec![
        online_agent("gpu", hf_core::Capability::Gpu, 0),
        online_agent("other", hf_core::Capability::Gpu, 1000),
    ];
    let weights: Vec<f64> = agents.iter().map(weight_for).collect();
    assert_eq!(weights[0], 5.0);
    assert_eq!(weights[1], 1000.0);
}

#[test]
fn vendor_weight_table_is_case_insensitive() {
    let rtx = online_agent("r", hf_core::Capability::Vendor("rtx 4090".into()), 0);
    let gtx = online_agent("g", hf_core::Capability::Vendor("GTX 1080".into()), 0);
    assert_eq!(weight_for(&rtx), 8.0);
    assert_eq!(weight_for(&gtx), 6.0);
}

#[test]
fn tie_break_orders_by_ascending_agent_id() {
    let agents = vec![
        online_agent("zzz", hf_core::Capability::Gpu, 1000),
        online_agent("aaa", hf_core::Capability::Gpu, 1000),
    ];
    let ordered = order_by_weight(agents);
    assert!(ordered[0].0.id <= ordered[1].0.id);
}

proptest! {
    #[test]
    fn shares_always_sum_to_the_total(
        total in 0u64..100_000,
        weights in prop::collection::vec(0.01f64..1000.0, 1..8),
    ) {
        let shares = largest_remainder_shares(total, &weights);
        let sum: u64 = shares.iter().sum();
        prop_assert_eq!(sum, total);
    }

    #[test]
    fn ranges_are_disjoint_and_cover_the_wordlist(
        total in 0u64..10_000,
        speeds in prop::collection::vec(1u64..5000, 1..6),
    ) {
        let agents: Vec<_> = speeds
            .into_iter()
            .enumerate()
            .map(|(i, speed)| online_agent(&format!("agent-{i}"), hf_core::Capability::Gpu, speed))
            .collect();
        let ordered = order_by_weight(agents);
        let plan = ranges(total, &ordered);

        let covered: u64 = plan.iter().map(|(_, r)| r.limit).sum();
        prop_assert_eq!(covered, total);

        let mut sorted: Vec<_> = plan.iter().map(|(_, r)| (r.skip, r.end())).collect();
        sorted.sort();
        let mut cursor = 0u64;
        for (skip, end) in sorted {
            prop_assert_eq!(skip, cursor);
            cursor = end;
        }
        prop_assert_eq!(cursor, total);
    }
}
