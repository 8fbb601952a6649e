//! Pre-model exploration from a default ranking.
//!
//! Before a trained policy exists the caller still knows a sensible default ordering.
//! The explorers here turn that ordering into an explicit distribution (not a sampled
//! action); a drawing explorer, normally [`GenericTopSlotExplorer`], then picks the
//! top slot from it.

use crate::epsilon_greedy::validate_epsilon;
use crate::{
    ActionProbability, Error, Explorer, ExplorerDecision, FallbackExplorer,
    GenericTopSlotExplorer, InitialExplorer, Prg, Result,
};

/// `1 - epsilon` extra mass on the first default action, `epsilon` spread evenly.
///
/// At `epsilon = 1` this is the same flat distribution as
/// [`UniformRandomInitialExplorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedyInitialExplorer {
    epsilon: f64,
}

impl EpsilonGreedyInitialExplorer {
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl InitialExplorer<Vec<u32>> for EpsilonGreedyInitialExplorer {
    type PolicyValue = Vec<ActionProbability>;

    fn explore(&self, default_value: &Vec<u32>) -> Result<Vec<ActionProbability>> {
        if default_value.is_empty() {
            return Err(Error::Empty("default ranking"));
        }
        let base = self.epsilon / default_value.len() as f64;
        let mut dist: Vec<ActionProbability> = default_value
            .iter()
            .map(|&a| ActionProbability::new(a, base))
            .collect();
        dist[0].probability += 1.0 - self.epsilon;
        Ok(dist)
    }
}

/// Flat `1 / N` over the default actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformRandomInitialExplorer;

impl InitialExplorer<Vec<u32>> for UniformRandomInitialExplorer {
    type PolicyValue = Vec<ActionProbability>;

    fn explore(&self, default_value: &Vec<u32>) -> Result<Vec<ActionProbability>> {
        if default_value.is_empty() {
            return Err(Error::Empty("default ranking"));
        }
        let p = 1.0 / default_value.len() as f64;
        Ok(default_value
            .iter()
            .map(|&a| ActionProbability::new(a, p))
            .collect())
    }
}

/// An [`InitialExplorer`] feeding a drawing [`Explorer`].
#[derive(Debug, Clone)]
pub struct InitialExploration<I, X> {
    initial: I,
    draw: X,
}

impl<I, X> InitialExploration<I, X> {
    pub fn new(initial: I, draw: X) -> Self {
        Self { initial, draw }
    }
}

impl<I> InitialExploration<I, GenericTopSlotExplorer> {
    /// Draw the top slot with a [`GenericTopSlotExplorer`].
    pub fn top_slot(initial: I) -> Self {
        Self::new(initial, GenericTopSlotExplorer::new())
    }
}

impl<V, I, X> FallbackExplorer<V> for InitialExploration<I, X>
where
    I: InitialExplorer<V>,
    X: Explorer<PolicyValue = I::PolicyValue, Value = V>,
{
    fn explore_default(
        &self,
        prg: &mut Prg,
        default_value: &V,
        num_actions: u32,
    ) -> Result<ExplorerDecision<V>> {
        let distribution = self.initial.explore(default_value)?;
        self.draw.map_context(prg, &distribution, num_actions)
    }
}
