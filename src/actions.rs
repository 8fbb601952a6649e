//! Action-id bookkeeping shared by all explorers.
//!
//! Conventions:
//! - Action ids are 1-based `u32`s in `[1, num_actions]`.
//! - A ranking is an ordered list of distinct action ids; position 0 is the top slot.
//! - Single actions and rankings are unified by [`ActionValue`], so explorers that
//!   only care about the top action (bootstrap) are written once.

use std::collections::HashSet;

use crate::{Error, Result};

/// A value an explorer can return: a single action or a ranking of actions.
pub trait ActionValue {
    /// The action in the top slot (the action itself for single-action values).
    fn top_action(&self) -> Option<u32>;

    /// Fail unless every action id is in `[1, num_actions]` (and, for rankings,
    /// distinct).
    fn validate(&self, num_actions: u32) -> Result<()>;
}

impl ActionValue for u32 {
    fn top_action(&self) -> Option<u32> {
        Some(*self)
    }

    fn validate(&self, num_actions: u32) -> Result<()> {
        validate_action(*self, num_actions)
    }
}

impl ActionValue for Vec<u32> {
    fn top_action(&self) -> Option<u32> {
        self.first().copied()
    }

    fn validate(&self, num_actions: u32) -> Result<()> {
        validate_ranking(self, num_actions)
    }
}

/// Pick the effective action count: a fixed count configured on the explorer wins
/// over the per-call count.
pub fn resolve_num_actions(fixed: Option<u32>, variable: u32) -> Result<u32> {
    let n = fixed.unwrap_or(variable);
    if n == 0 {
        return Err(Error::InvalidNumberOfActions(0));
    }
    Ok(n)
}

/// Validate a fixed action count supplied at construction time.
pub fn validate_num_actions(n: u32) -> Result<u32> {
    if n == 0 {
        Err(Error::InvalidNumberOfActions(0))
    } else {
        Ok(n)
    }
}

/// Fail unless `action` is in `[1, num_actions]`. Never clamps.
pub fn validate_action(action: u32, num_actions: u32) -> Result<()> {
    if action == 0 || action > num_actions {
        return Err(Error::ActionOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(())
}

/// Fail unless `ranking` is non-empty, in range, and free of duplicates.
pub fn validate_ranking(ranking: &[u32], num_actions: u32) -> Result<()> {
    if ranking.is_empty() {
        return Err(Error::Empty("ranking"));
    }
    let mut seen = HashSet::with_capacity(ranking.len());
    for &a in ranking {
        validate_action(a, num_actions)?;
        if !seen.insert(a) {
            return Err(Error::DuplicateAction(a));
        }
    }
    Ok(())
}

/// Like [`validate_ranking`], and additionally require one entry per action, i.e.
/// `ranking` is a permutation of `[1, num_actions]`.
pub fn validate_full_ranking(ranking: &[u32], num_actions: u32) -> Result<()> {
    if ranking.len() != num_actions as usize {
        return Err(Error::LengthMismatch {
            expected: num_actions as usize,
            actual: ranking.len(),
        });
    }
    validate_ranking(ranking, num_actions)
}

/// `[1, 2, ..., n]`.
pub fn identity_ranking(n: u32) -> Vec<u32> {
    (1..=n).collect()
}

/// Move `action` to position 0, shifting the elements before it down by one so the
/// rest keep their relative order.
///
/// Returns `false` (and leaves the slice untouched) if `action` is absent.
pub fn move_to_front(ranking: &mut [u32], action: u32) -> bool {
    match ranking.iter().position(|&a| a == action) {
        Some(pos) => {
            ranking[..=pos].rotate_right(1);
            true
        }
        None => false,
    }
}
