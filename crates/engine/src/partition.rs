// SPDX-License-Identifier: MIT

//! Pure functions behind the Scheduler/Partitioner's distributed mode. Kept
//! free of `AgentRegistry`/`JobStore` so the rounding and ordering invariants
//! (shares sum to the wordlist length, ranges disjoint and covering) are
//! directly proptest-able.

use hf_core::{Agent, AgentId, Capability, SkipLimit};
use std::cmp::Ordering;

/// Per-agent weight used to compute a proportional share: the agent's own
/// measured speed when known, else a capability-based constant.
pub fn weight_for(agent: &Agent) -> f64 {
    if agent.speed_hps > 0 {
        return agent.speed_hps as f64;
    }
    match agent.capability.as_ref() {
        Some(Capability::Cpu) => 1.0,
        Some(Capability::Gpu) => 5.0,
        Some(Capability::Vendor(label)) => {
            let lower = label.to_ascii_lowercase();
            if lower.contains("rtx") {
                8.0
            } else if lower.contains("gtx") {
                6.0
            } else if lower.contains("gpu") {
                5.0
            } else if lower.contains("cpu") {
                1.0
            } else {
                1.0
            }
        }
        None => 0.0,
    }
}

/// Sort agents by descending weight, tie-broken by ascending agent id — a
/// stable, reproducible layout across repeated calls.
pub fn order_by_weight(mut agents: Vec<Agent>) -> Vec<(Agent, f64)> {
    let mut weighted: Vec<(Agent, f64)> =
        agents.drain(..).map(|agent| {
            let w = weight_for(&agent);
            (agent, w)
        }).collect();
    weighted.sort_by(|(a, wa), (b, wb)| {
        wb.partial_cmp(wa).unwrap_or(Ordering::Equal).then_with(|| a.id.cmp(&b.id))
    });
    weighted
}

/// Largest-remainder apportionment: floor each share, then hand out the
/// residual one unit at a time to the largest fractional remainders
/// (tie-break: earlier position in `weights` wins, i.e. higher weight / lower
/// id per [`order_by_weight`]'s ordering) until the shares sum to `total`.
pub fn largest_remainder_shares(total: u64, weights: &[f64]) -> Vec<u64> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return vec![0; weights.len()];
    }
    let exact: Vec<f64> = weights.iter().map(|w| total as f64 * w / sum).collect();
    let mut shares: Vec<u64> = exact.iter().map(|e| e.floor() as u64).collect();
    let assigned: u64 = shares.iter().sum();
    let mut residual = total.saturating_sub(assigned);

    let mut remainders: Vec<usize> = (0..weights.len()).collect();
    remainders.sort_by(|&i, &j| {
        let ri = exact[i] - exact[i].floor();
        let rj = exact[j] - exact[j].floor();
        rj.partial_cmp(&ri).unwrap_or(Ordering::Equal).then(i.cmp(&j))
    });
    for &i in remainders.iter() {
        if residual == 0 {
            break;
        }
        shares[i] += 1;
        residual -= 1;
    }
    shares
}

/// Compute a contiguous, disjoint, covering `skip`/`limit` range per agent,
/// agents already ordered by [`order_by_weight`].
pub fn ranges(wordlist_len: u64, ordered: &[(Agent, f64)]) -> Vec<(AgentId, SkipLimit)> {
    let weights: Vec<f64> = ordered.iter().map(|(_, w)| *w).collect();
    let shares = largest_remainder_shares(wordlist_len, &weights);
    let mut skip = 0u64;
    let mut out = Vec::with_capacity(ordered.len());
    for ((agent, _), limit) in ordered.iter().zip(shares) {
        out.push((agent.id, SkipLimit { skip, limit }));
        skip += limit;
    }
    out
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
