//! Epsilon-greedy over whole rankings.
//!
//! With probability `1 - epsilon` the default ranking is shown as is; otherwise a
//! uniformly random permutation replaces it entirely. Slots are never decided one by
//! one.

use crate::actions::{resolve_num_actions, validate_full_ranking, validate_num_actions};
use crate::epsilon_greedy::validate_epsilon;
use crate::permutation::shuffled_ranking;
use crate::{EpsilonGreedySlateState, ExploreSwitch, Explorer, ExplorerDecision, Prg, Result};

#[derive(Debug, Clone)]
pub struct EpsilonGreedySlateExplorer {
    epsilon: f64,
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl EpsilonGreedySlateExplorer {
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
            num_actions: None,
            explore: ExploreSwitch::new(),
        })
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `ranking` must be a permutation of `[1, N]`.
    ///
    /// The recorded probability is the marginal probability of the returned top
    /// action: `1 - epsilon + epsilon / N` if it is the default top action, else
    /// `epsilon / N`.
    pub fn choose(
        &self,
        prg: &mut Prg,
        ranking: &[u32],
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        validate_full_ranking(ranking, n)?;

        let epsilon = if self.explore.is_enabled() {
            self.epsilon
        } else {
            0.0
        };
        let base = epsilon / f64::from(n);

        let u = prg.uniform_unit_interval();
        let (value, is_explore) = if u < 1.0 - epsilon {
            (ranking.to_vec(), false)
        } else {
            (shuffled_ranking(prg, n, None)?, true)
        };
        let probability = if value[0] == ranking[0] {
            1.0 - epsilon + base
        } else {
            base
        };

        Ok(ExplorerDecision::recorded(
            value,
            EpsilonGreedySlateState {
                probability,
                epsilon,
                ranking: ranking.to_vec(),
                is_explore,
            },
        ))
    }
}

impl Explorer for EpsilonGreedySlateExplorer {
    type PolicyValue = Vec<u32>;
    type Value = Vec<u32>;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Vec<u32>,
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        self.choose(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}
