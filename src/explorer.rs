//! Explorer traits.
//!
//! The roles, one trait each:
//!
//! - [`Explorer`]: consumes a policy's output plus a seeded [`Prg`] and returns an
//!   [`ExplorerDecision`]. Single actions and rankings are the same trait with a
//!   different `Value`.
//! - [`FullExplorer`]: explores with no policy at all (only the action count), used
//!   before any model exists.
//! - [`InitialExplorer`]: turns a caller-supplied default action/ranking into a policy
//!   value (an explicit distribution) that an [`Explorer`] then draws from.
//!   [`FallbackExplorer`] is the composed form the orchestrator calls.
//!
//! Explorers are stateless with respect to randomness: every draw comes from the
//! `Prg` handed in, which the orchestrator derives from the event identity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{ExplorerDecision, Prg, Result};

/// An exploration algorithm over a policy's output.
pub trait Explorer {
    /// What the policy hands the explorer (action, ranking, scores, distribution, ...).
    type PolicyValue;
    /// What the explorer returns (1-based action or ranking).
    type Value;

    /// Choose a value. `num_actions` is the per-call action count; explorers
    /// configured with a fixed count ignore it.
    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &Self::PolicyValue,
        num_actions: u32,
    ) -> Result<ExplorerDecision<Self::Value>>;

    /// Turn exploration on or off. Disabling never mutates configured parameters.
    fn enable_explore(&self, explore: bool);
}

impl<E: Explorer + ?Sized> Explorer for Box<E> {
    type PolicyValue = E::PolicyValue;
    type Value = E::Value;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &E::PolicyValue,
        num_actions: u32,
    ) -> Result<ExplorerDecision<E::Value>> {
        (**self).map_context(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        (**self).enable_explore(explore);
    }
}

impl<E: Explorer + ?Sized> Explorer for Arc<E> {
    type PolicyValue = E::PolicyValue;
    type Value = E::Value;

    fn map_context(
        &self,
        prg: &mut Prg,
        policy_value: &E::PolicyValue,
        num_actions: u32,
    ) -> Result<ExplorerDecision<E::Value>> {
        (**self).map_context(prg, policy_value, num_actions)
    }

    fn enable_explore(&self, explore: bool) {
        (**self).enable_explore(explore);
    }
}

/// Exploration with no policy: the explorer *is* the policy.
pub trait FullExplorer {
    type Value;

    fn explore(&self, prg: &mut Prg, num_actions: u32) -> Result<ExplorerDecision<Self::Value>>;
}

/// Maps a default action value to a policy value before any model is available.
pub trait InitialExplorer<V: ?Sized> {
    type PolicyValue;

    fn explore(&self, default_value: &V) -> Result<Self::PolicyValue>;
}

/// Explores around a caller-supplied default value when no trained policy exists.
///
/// See [`InitialExploration`](crate::InitialExploration) for the usual composition of
/// an [`InitialExplorer`] with an [`Explorer`] that performs the draw.
pub trait FallbackExplorer<V> {
    fn explore_default(
        &self,
        prg: &mut Prg,
        default_value: &V,
        num_actions: u32,
    ) -> Result<ExplorerDecision<V>>;
}

/// Shared on/off switch for exploration, safe to flip from any thread.
#[derive(Debug)]
pub struct ExploreSwitch(AtomicBool);

impl ExploreSwitch {
    pub fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn set(&self, explore: bool) {
        self.0.store(explore, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ExploreSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ExploreSwitch {
    fn clone(&self) -> Self {
        Self(AtomicBool::new(self.is_enabled()))
    }
}
