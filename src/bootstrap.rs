//! Bootstrap (bagging) exploration over an ensemble of policies.
//!
//! One bag is drawn uniformly and its value is returned. Every bag has already been
//! evaluated (see [`PolicyEnsemble`](crate::PolicyEnsemble)), so the recorded
//! probability is the fraction of bags whose top action agrees with the chosen one.
//!
//! The same explorer serves single actions (`A = u32`) and rankings
//! (`A = Vec<u32>`, agreement counted on the top slot, the chosen bag's whole
//! ranking returned).

use std::marker::PhantomData;

use crate::actions::{resolve_num_actions, validate_num_actions, ActionValue};
use crate::{
    Error, ExploreSwitch, Explorer, ExplorerDecision, GenericState, Prg, Result,
};

#[derive(Debug)]
pub struct BootstrapExplorer<A> {
    num_actions: Option<u32>,
    explore: ExploreSwitch,
    _marker: PhantomData<fn() -> A>,
}

/// Bootstrap over rankings.
pub type TopSlotBootstrapExplorer = BootstrapExplorer<Vec<u32>>;

impl<A> BootstrapExplorer<A> {
    pub fn new() -> Self {
        Self {
            num_actions: None,
            explore: ExploreSwitch::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }
}

impl<A> Default for BootstrapExplorer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ActionValue + Clone> BootstrapExplorer<A> {
    /// Pick one of `bags` (one value per ensemble member).
    pub fn choose(&self, prg: &mut Prg, bags: &[A], num_actions: u32) -> Result<ExplorerDecision<A>> {
        if bags.is_empty() {
            return Err(Error::Empty("bootstrap bags"));
        }
        let n = resolve_num_actions(self.num_actions, num_actions)?;

        if !self.explore.is_enabled() {
            let value = bags[0].clone();
            value.validate(n)?;
            return Ok(ExplorerDecision::recorded(value, GenericState { probability: 1.0 }));
        }

        let mut tops = Vec::with_capacity(bags.len());
        for bag in bags {
            bag.validate(n)?;
            tops.push(bag.top_action().ok_or(Error::Empty("ranking"))?);
        }

        let chosen = prg.uniform_index(0, bags.len() - 1)?;
        let agree = tops.iter().filter(|&&a| a == tops[chosen]).count();
        let probability = agree as f64 / bags.len() as f64;
        log::trace!("bootstrap bag={chosen} agree={agree}/{}", bags.len());

        Ok(ExplorerDecision::recorded(
            bags[chosen].clone(),
            GenericState { probability },
        ))
    }
}

impl<A: ActionValue + Clone> Explorer for BootstrapExplorer<A> {
    type PolicyValue = Vec<A>;
    type Value = A;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Vec<A>,
        num_actions: u32,
    ) -> Result<ExplorerDecision<A>> {
        self.choose(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_bag_agreement() {
        let ex = BootstrapExplorer::<u32>::new();
        let bags = [5u32, 5, 7];
        let mut seen = [false; 2];
        for seed in 0..200 {
            let d = ex.choose(&mut Prg::new(seed), &bags, 7).unwrap();
            match d.value {
                5 => {
                    assert!((d.probability() - 2.0 / 3.0).abs() < 1e-12);
                    seen[0] = true;
                }
                7 => {
                    assert!((d.probability() - 1.0 / 3.0).abs() < 1e-12);
                    seen[1] = true;
                }
                other => panic!("unexpected action {other}"),
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn disabled_exploration_returns_first_bag() {
        let ex = BootstrapExplorer::<u32>::new();
        ex.enable_explore(false);
        let d = ex.choose(&mut Prg::new(3), &[7, 5, 5], 7).unwrap();
        assert_eq!(d.value, 7);
        assert_eq!(d.probability(), 1.0);
    }

    #[test]
    fn any_bag_out_of_range_fails() {
        let ex = BootstrapExplorer::<u32>::new();
        assert!(ex.choose(&mut Prg::new(0), &[1, 0], 3).is_err());
        assert!(ex.choose(&mut Prg::new(0), &[1, 4], 3).is_err());
        assert_eq!(
            ex.choose(&mut Prg::new(0), &[], 3).unwrap_err(),
            Error::Empty("bootstrap bags")
        );
    }

    #[test]
    fn rankings_agree_on_top_slot() {
        let ex = TopSlotBootstrapExplorer::new().with_num_actions(3).unwrap();
        let bags = vec![vec![1, 2, 3], vec![1, 3, 2], vec![2, 1, 3], vec![3, 2, 1]];
        for seed in 0..100 {
            let d = ex.choose(&mut Prg::new(seed), &bags, 0).unwrap();
            assert!(bags.contains(&d.value));
            let expected = match d.value[0] {
                1 => 0.5,
                _ => 0.25,
            };
            assert!((d.probability() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ranking_with_duplicate_fails() {
        let ex = TopSlotBootstrapExplorer::new();
        assert_eq!(
            ex.choose(&mut Prg::new(0), &[vec![1, 1]], 3).unwrap_err(),
            Error::DuplicateAction(1)
        );
    }
}
