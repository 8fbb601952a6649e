//! Exploration from an explicit (possibly unnormalized) weight vector.
//!
//! - [`GenericExplorer`]: one action, inverse-CDF on a single draw.
//! - [`GenericSampleWithoutReplacementExplorer`]: a full ranking.
//! - [`GenericTopSlotExplorer`]: draw the top slot from an explicit
//!   [`ActionProbability`] distribution over an existing ranking and move the winner
//!   to the front.

use crate::actions::{
    move_to_front, resolve_num_actions, validate_num_actions, validate_ranking,
};
use crate::sampling::{
    argmax, argmax_ordering, sample_index, sample_without_replacement, validate_weights,
};
use crate::{
    ActionProbability, Error, ExploreSwitch, Explorer, ExplorerDecision, GenericState, Prg,
    Result, TopSlotDistributionState,
};

/// Tolerance on `sum(p) == 1` for explicit distributions.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

fn check_len(weights: &[f64], num_actions: u32) -> Result<()> {
    if weights.len() != num_actions as usize {
        return Err(Error::LengthMismatch {
            expected: num_actions as usize,
            actual: weights.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct GenericExplorer {
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl GenericExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn choose(&self, prg: &mut Prg, weights: &[f64], num_actions: u32) -> Result<ExplorerDecision<u32>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        check_len(weights, n)?;
        let total = validate_weights(weights)?;

        let (index, probability) = if self.explore.is_enabled() {
            sample_index(weights, total, prg.uniform_unit_interval())
        } else {
            (argmax(weights).ok_or(Error::Empty("weights"))?, 1.0)
        };
        Ok(ExplorerDecision::recorded(
            index as u32 + 1,
            GenericState { probability },
        ))
    }
}

impl Explorer for GenericExplorer {
    type PolicyValue = Vec<f64>;
    type Value = u32;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Vec<f64>,
        num_actions: u32,
    ) -> Result<ExplorerDecision<u32>> {
        self.choose(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}

/// Full ranking from weights; records the top slot's probability.
#[derive(Debug, Clone, Default)]
pub struct GenericSampleWithoutReplacementExplorer {
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl GenericSampleWithoutReplacementExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn choose(
        &self,
        prg: &mut Prg,
        weights: &[f64],
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        check_len(weights, n)?;

        let (order, probability) = if self.explore.is_enabled() {
            sample_without_replacement(weights, prg)?
        } else {
            validate_weights(weights)?;
            (argmax_ordering(weights).ok_or(Error::Empty("weights"))?, 1.0)
        };
        let ranking = order.into_iter().map(|i| i as u32 + 1).collect();
        Ok(ExplorerDecision::recorded(ranking, GenericState { probability }))
    }
}

impl Explorer for GenericSampleWithoutReplacementExplorer {
    type PolicyValue = Vec<f64>;
    type Value = Vec<u32>;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Vec<f64>,
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        self.choose(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}

/// Draws the top slot from an explicit distribution.
///
/// The distribution's actions, in order, are the ranking; the drawn action moves to
/// the front. Probabilities must sum to 1 within [`NORMALIZATION_TOLERANCE`]. The
/// recorded state carries both the drawn action's probability and the whole vector.
#[derive(Debug, Clone, Default)]
pub struct GenericTopSlotExplorer {
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl GenericTopSlotExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn choose(
        &self,
        prg: &mut Prg,
        distribution: &[ActionProbability],
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        if distribution.is_empty() {
            return Err(Error::Empty("distribution"));
        }
        let mut ranking: Vec<u32> = distribution.iter().map(|ap| ap.action).collect();
        validate_ranking(&ranking, n)?;

        let probabilities: Vec<f64> = distribution.iter().map(|ap| ap.probability).collect();
        let total = validate_weights(&probabilities)?;
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(Error::ProbabilitiesNotNormalized(total));
        }

        let (index, probability) = if self.explore.is_enabled() {
            sample_index(&probabilities, total, prg.uniform_unit_interval())
        } else {
            (argmax(&probabilities).ok_or(Error::Empty("distribution"))?, 1.0)
        };
        move_to_front(&mut ranking, distribution[index].action);

        Ok(ExplorerDecision::recorded(
            ranking,
            TopSlotDistributionState {
                probability,
                probabilities,
            },
        ))
    }
}

impl Explorer for GenericTopSlotExplorer {
    type PolicyValue = Vec<ActionProbability>;
    type Value = Vec<u32>;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Vec<ActionProbability>,
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        self.choose(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExplorerState;
    use proptest::prelude::*;

    fn dist(pairs: &[(u32, f64)]) -> Vec<ActionProbability> {
        pairs
            .iter()
            .map(|&(a, p)| ActionProbability::new(a, p))
            .collect()
    }

    #[test]
    fn weights_need_not_be_normalized() {
        let ex = GenericExplorer::new();
        for seed in 0..100 {
            let d = ex.choose(&mut Prg::new(seed), &[2.0, 0.0, 6.0], 3).unwrap();
            match d.value {
                1 => assert_eq!(d.probability(), 0.25),
                3 => assert_eq!(d.probability(), 0.75),
                other => panic!("zero-weight action {other} drawn"),
            }
        }
    }

    #[test]
    fn invalid_weights_fail() {
        let ex = GenericExplorer::new();
        assert_eq!(
            ex.choose(&mut Prg::new(0), &[0.0, 0.0], 2).unwrap_err(),
            Error::ZeroWeights
        );
        assert!(ex.choose(&mut Prg::new(0), &[1.0, -1.0], 2).is_err());
        assert!(ex.choose(&mut Prg::new(0), &[1.0, 1.0], 3).is_err());

        let swor = GenericSampleWithoutReplacementExplorer::new();
        assert!(swor.choose(&mut Prg::new(0), &[0.0, 0.0], 2).is_err());
        swor.enable_explore(false);
        assert!(swor.choose(&mut Prg::new(0), &[0.0, 0.0], 2).is_err());
    }

    #[test]
    fn disabled_generic_picks_argmax() {
        let ex = GenericExplorer::new().with_num_actions(3).unwrap();
        ex.enable_explore(false);
        let d = ex.choose(&mut Prg::new(0), &[0.1, 0.7, 0.2], 0).unwrap();
        assert_eq!((d.value, d.probability()), (2, 1.0));
    }

    #[test]
    fn top_slot_moves_drawn_action_to_front() {
        let ex = GenericTopSlotExplorer::new();
        let d = dist(&[(3, 0.5), (1, 0.25), (2, 0.25)]);
        for seed in 0..100 {
            let out = ex.choose(&mut Prg::new(seed), &d, 3).unwrap();
            let expected_rest: Vec<u32> = [3u32, 1, 2]
                .into_iter()
                .filter(|&a| a != out.value[0])
                .collect();
            assert_eq!(&out.value[1..], &expected_rest[..]);
            match &out.state {
                ExplorerState::TopSlotDistribution(s) => {
                    assert_eq!(s.probabilities, vec![0.5, 0.25, 0.25]);
                    let expected = if out.value[0] == 3 { 0.5 } else { 0.25 };
                    assert_eq!(s.probability, expected);
                }
                other => panic!("unexpected state {other:?}"),
            }
        }
    }

    #[test]
    fn top_slot_requires_a_normalized_distribution() {
        let ex = GenericTopSlotExplorer::new();
        assert_eq!(
            ex.choose(&mut Prg::new(0), &dist(&[(1, 0.5), (2, 0.6)]), 2)
                .unwrap_err(),
            Error::ProbabilitiesNotNormalized(1.1)
        );
        assert!(ex
            .choose(&mut Prg::new(0), &dist(&[(1, 0.5), (2, 0.5 + 1e-7)]), 2)
            .is_ok());
        assert!(ex
            .choose(&mut Prg::new(0), &dist(&[(1, 0.5), (1, 0.5)]), 2)
            .is_err());
        assert!(ex
            .choose(&mut Prg::new(0), &dist(&[(0, 0.5), (1, 0.5)]), 2)
            .is_err());
        assert!(ex.choose(&mut Prg::new(0), &[], 2).is_err());
    }

    proptest! {
        #[test]
        fn generic_probability_is_normalized_weight(
            weights in proptest::collection::vec(0.0f64..5.0, 1..12),
            seed in any::<u64>(),
        ) {
            let total: f64 = weights.iter().sum();
            prop_assume!(total > 0.0);
            let n = weights.len() as u32;
            let d = GenericExplorer::new().choose(&mut Prg::new(seed), &weights, n).unwrap();
            let i = d.value as usize - 1;
            prop_assert!(weights[i] > 0.0);
            prop_assert!((d.probability() - weights[i] / total).abs() < 1e-12);
        }
    }
}
