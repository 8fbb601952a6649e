//! Tau-first: explore uniformly for the first `tau` decisions, then follow the
//! policy forever.
//!
//! The budget is the only mutable state shared across calls. It is decremented with
//! a compare-and-swap so concurrent callers never overspend it: exactly `tau` calls
//! (with exploration enabled) explore, no matter how many threads race.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::actions::{resolve_num_actions, validate_action, validate_num_actions};
use crate::{ExploreSwitch, Explorer, ExplorerDecision, Prg, Result, TauFirstState};

#[derive(Debug)]
pub struct TauFirstExplorer {
    remaining: AtomicU64,
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl TauFirstExplorer {
    pub fn new(tau: u64) -> Self {
        Self {
            remaining: AtomicU64::new(tau),
            num_actions: None,
            explore: ExploreSwitch::new(),
        }
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    /// Exploration decisions left. Once zero it stays zero.
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Take one unit of budget; returns the budget seen before the decrement.
    fn take_budget(&self) -> Option<u64> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
            .ok()
    }

    pub fn choose(
        &self,
        prg: &mut Prg,
        default_action: u32,
        num_actions: u32,
    ) -> Result<ExplorerDecision<u32>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        validate_action(default_action, n)?;

        if self.explore.is_enabled() {
            if let Some(tau) = self.take_budget() {
                if tau == 1 {
                    log::info!("tau-first exploration budget exhausted");
                }
                let action = prg.uniform_action(n)?;
                return Ok(ExplorerDecision::recorded(
                    action,
                    TauFirstState {
                        probability: 1.0 / f64::from(n),
                        tau,
                        is_explore: true,
                    },
                ));
            }
        }

        Ok(ExplorerDecision::new(
            default_action,
            TauFirstState {
                probability: 1.0,
                tau: self.remaining(),
                is_explore: false,
            },
            false,
        ))
    }
}

impl Explorer for TauFirstExplorer {
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
