//! Successor selection rules.

use ped_core::StageId;

/// How an agent picks its next stage once it has arrived at the current one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    /// Always the same successor.
    Fixed(StageId),
    /// The candidate whose target is closest to the agent.  Ties go to the
    /// earlier entry.
    Nearest(Vec<StageId>),
    /// A random candidate with probability proportional to its weight.
    /// Draws are deterministic per (seed, agent, decision number).
    WeightedRandom(Vec<(StageId, u32)>),
    /// Cycle through the candidates, each taken `weight` times in a row.
    /// The counter belongs to the journey and is shared by its agents.
    RoundRobin(Vec<(StageId, u32)>),
}

impl Transition {
    /// Every stage this transition can lead to.
    pub fn candidates(&self) -> Vec<StageId> {
        match self {
            Transition::Fixed(s) => vec![*s],
            Transition::Nearest(c) => c.clone(),
            Transition::WeightedRandom(c) | Transition::RoundRobin(c) => {
                c.iter().map(|&(s, _)| s).collect()
            }
        }
    }

    /// Structural check independent of any stage arena.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        match self {
            Transition::Fixed(_) => Ok(()),
            Transition::Nearest(c) if c.is_empty() => Err("no candidates"),
            Transition::Nearest(_) => Ok(()),
            Transition::WeightedRandom(c) | Transition::RoundRobin(c) => {
                if c.is_empty() {
                    Err("no candidates")
                } else if c.iter().all(|&(_, w)| w == 0) {
                    Err("all weights are zero")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Stage picked by a weighted round-robin at step `counter`.
pub(crate) fn round_robin_pick(weights: &[(StageId, u32)], counter: u64) -> Option<StageId> {
    let total: u64 = weights.iter().map(|&(_, w)| w as u64).sum();
    if total == 0 {
        return None;
    }
    let mut slot = counter % total;
    for &(stage, w) in weights {
        let w = w as u64;
        if slot < w {
            return Some(stage);
        }
        slot -= w;
    }
    None
}
