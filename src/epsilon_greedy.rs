//! Epsilon-greedy over a single default action.
//!
//! With probability `1 - epsilon` the policy's action is returned; otherwise a
//! uniformly random action is drawn. The recorded probability of the default action
//! is `1 - epsilon + epsilon / N` on either path (the explore draw can land on it
//! too), and `epsilon / N` for any other action.

use crate::actions::{resolve_num_actions, validate_action, validate_num_actions};
use crate::{EpsilonGreedyState, Error, ExploreSwitch, Explorer, ExplorerDecision, Prg, Result};

/// Fail unless `epsilon` is finite and in `[0, 1]`.
pub(crate) fn validate_epsilon(epsilon: f64) -> Result<f64> {
    if !epsilon.is_finite() {
        return Err(Error::NonFinite {
            name: "epsilon",
            value: epsilon,
        });
    }
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(Error::EpsilonOutOfRange(epsilon));
    }
    Ok(epsilon)
}

/// Single-action epsilon-greedy explorer.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyExplorer {
    epsilon: f64,
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl EpsilonGreedyExplorer {
    /// Variable action count: `N` comes from each call.
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
            num_actions: None,
            explore: ExploreSwitch::new(),
        })
    }

    /// Pin the action count; per-call counts are then ignored.
    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Explore around `default_action`.
    pub fn choose(
        &self,
        prg: &mut Prg,
        default_action: u32,
        num_actions: u32,
    ) -> Result<ExplorerDecision<u32>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        validate_action(default_action, n)?;

        let epsilon = if self.explore.is_enabled() {
            self.epsilon
        } else {
            0.0
        };
        let base = epsilon / f64::from(n);
        let boosted = 1.0 - epsilon + base;

        let u = prg.uniform_unit_interval();
        let (action, probability, is_explore) = if u < 1.0 - epsilon {
            (default_action, boosted, false)
        } else {
            let drawn = prg.uniform_action(n)?;
            let p = if drawn == default_action { boosted } else { base };
            (drawn, p, true)
        };
        log::trace!("epsilon-greedy u={u} action={action} explore={is_explore}");

        Ok(ExplorerDecision::recorded(
            action,
            EpsilonGreedyState {
                probability,
                epsilon,
                is_explore,
            },
        ))
    }
}

impl Explorer for EpsilonGreedyExplorer {
    type PolicyValue = u32;
    type Value = u32;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &u32,
        num_actions: u32,
    ) -> Result<ExplorerDecision<u32>> {
        self.choose(prg, *policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}
