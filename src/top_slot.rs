//! Reuse any single-action explorer on the top slot of a ranking.
//!
//! The wrapped explorer sees only the ranking's first action as its default. Whatever
//! it picks is moved to the front; every other action keeps its relative order. The
//! recorded state is the wrapped explorer's, so its probability is the top slot's.

use crate::actions::{move_to_front, resolve_num_actions, validate_full_ranking, validate_num_actions};
use crate::{Error, Explorer, ExplorerDecision, Prg, Result};

#[derive(Debug, Clone)]
pub struct TopSlotExplorer<E> {
    inner: E,
    num_actions: Option<u32>,
}

impl<E> TopSlotExplorer<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            num_actions: None,
        }
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E> TopSlotExplorer<E>
where
    E: Explorer<PolicyValue = u32, Value = u32>,
{
    /// `ranking` must be a permutation of `[1, N]`.
    pub fn choose(
        &self,
        prg: &mut Prg,
        ranking: &[u32],
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        validate_full_ranking(ranking, n)?;

        let top = self.inner.map_context(prg, &ranking[0], n)?;
        let mut out = ranking.to_vec();
        if !move_to_front(&mut out, top.value) {
            return Err(Error::ActionOutOfRange {
                action: top.value,
                num_actions: n,
            });
        }
        Ok(top.map_value(|_| out))
    }
}

impl<E> Explorer for TopSlotExplorer<E>
where
    E: Explorer<PolicyValue = u32, Value = u32>,
{
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
        self.inner.enable_explore(explore);
    }
}
