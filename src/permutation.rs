//! Full exploration: no policy, the explorer decides everything.

use crate::actions::{identity_ranking, resolve_num_actions, validate_num_actions};
use crate::{ExplorerDecision, FullExplorer, GenericState, Prg, Result};

/// Fisher–Yates over `[1, n]`, randomizing at most `limit` leading positions.
///
/// Positions past the limit keep whatever the swaps left there. With no limit every
/// permutation is equally likely.
pub(crate) fn shuffled_ranking(prg: &mut Prg, n: u32, limit: Option<usize>) -> Result<Vec<u32>> {
    let mut ranking = identity_ranking(n);
    let len = ranking.len();
    let rounds = limit.map_or(len.saturating_sub(1), |m| m.min(len.saturating_sub(1)));
    for i in 0..rounds {
        let j = prg.uniform_index(i, len - 1)?;
        ranking.swap(i, j);
    }
    Ok(ranking)
}

/// Uniformly random ranking of `[1, N]`.
///
/// Recorded probability is 1: without a policy there is nothing to importance-weight
/// against.
#[derive(Debug, Clone, Default)]
pub struct PermutationExplorer {
    max_permutations: Option<usize>,
    num_actions: Option<u32>,
}

impl PermutationExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Randomize only the first `max_permutations` positions.
    pub fn with_max_permutations(mut self, max_permutations: usize) -> Self {
        self.max_permutations = Some(max_permutations);
        self
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }
}

impl FullExplorer for PermutationExplorer {
    type Value = Vec<u32>;

    fn explore(&self, prg: &mut Prg, num_actions: u32) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        let ranking = shuffled_ranking(prg, n, self.max_permutations)?;
        Ok(ExplorerDecision::recorded(
            ranking,
            GenericState { probability: 1.0 },
        ))
    }
}

/// Uniformly random single action; records the true `1 / N`.
#[derive(Debug, Clone, Default)]
pub struct UniformRandomExploration {
    num_actions: Option<u32>,
}

impl UniformRandomExploration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }
}

impl FullExplorer for UniformRandomExploration {
    type Value = u32;

    fn explore(&self, prg: &mut Prg, num_actions: u32) -> Result<ExplorerDecision<u32>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        let action = prg.uniform_action(n)?;
        Ok(ExplorerDecision::recorded(
            action,
            GenericState {
                probability: 1.0 / f64::from(n),
            },
        ))
    }
}
