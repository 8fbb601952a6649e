//! Policy-side collaborator interfaces.
//!
//! A policy (or ranker, or scorer) is anything that maps a context to a value an
//! explorer consumes: a single action, a ranking, a score vector, an explicit
//! distribution, or one value per bag of an ensemble. All of those are the same
//! [`ContextMapper`] trait with a different `Value`.
//!
//! Implementations must be thread-safe if the orchestrator is shared across threads
//! and should be side-effect free from the explorer's point of view.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::{Error, PolicyDecision, Result};

/// Maps a context to a policy decision.
///
/// # Example
///
/// ```rust
/// use mwt::{ContextMapper, FnMapper, PolicyDecision};
///
/// // A "model" that ranks by context parity, tagging decisions with its version.
/// let ranker = FnMapper::new(|ctx: &u64| -> mwt::Result<PolicyDecision<Vec<u32>, &'static str>> {
///     let ranking = if ctx % 2 == 0 { vec![1, 2, 3] } else { vec![3, 2, 1] };
///     Ok(PolicyDecision::new(ranking, "model-v1"))
/// });
/// let d = ranker.map_context(&7).unwrap();
/// assert_eq!(d.value, vec![3, 2, 1]);
/// assert_eq!(d.state, "model-v1");
/// ```
pub trait ContextMapper<C: ?Sized> {
    /// What the policy produces (action, ranking, scores, ...).
    type Value;
    /// Opaque policy state carried to the recorder.
    type State;

    fn map_context(&self, context: &C) -> Result<PolicyDecision<Self::Value, Self::State>>;
}

impl<C: ?Sized, M: ContextMapper<C> + ?Sized> ContextMapper<C> for Box<M> {
    type Value = M::Value;
    type State = M::State;

    fn map_context(&self, context: &C) -> Result<PolicyDecision<M::Value, M::State>> {
        (**self).map_context(context)
    }
}

impl<C: ?Sized, M: ContextMapper<C> + ?Sized> ContextMapper<C> for Arc<M> {
    type Value = M::Value;
    type State = M::State;

    fn map_context(&self, context: &C) -> Result<PolicyDecision<M::Value, M::State>> {
        (**self).map_context(context)
    }
}

/// A [`ContextMapper`] backed by a closure.
pub struct FnMapper<F, V, S> {
    f: F,
    _marker: PhantomData<fn() -> (V, S)>,
}

impl<F, V, S> FnMapper<F, V, S> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<C, F, V, S> ContextMapper<C> for FnMapper<F, V, S>
where
    C: ?Sized,
    F: Fn(&C) -> Result<PolicyDecision<V, S>>,
{
    type Value = V;
    type State = S;

    fn map_context(&self, context: &C) -> Result<PolicyDecision<V, S>> {
        (self.f)(context)
    }
}

/// A policy that ignores the context and always proposes the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPolicy<V, S = ()> {
    value: V,
    state: S,
}

impl<V> FixedPolicy<V, ()> {
    pub fn new(value: V) -> Self {
        Self { value, state: () }
    }
}

impl<V, S> FixedPolicy<V, S> {
    pub fn with_state(value: V, state: S) -> Self {
        Self { value, state }
    }
}

impl<C: ?Sized, V: Clone, S: Clone> ContextMapper<C> for FixedPolicy<V, S> {
    type Value = V;
    type State = S;

    fn map_context(&self, _context: &C) -> Result<PolicyDecision<V, S>> {
        Ok(PolicyDecision::new(self.value.clone(), self.state.clone()))
    }
}

/// A bag of independently trained policies, evaluated together.
///
/// Mapping a context queries **every** bag (O(B) evaluations) so a bootstrap
/// explorer can compute how strongly the ensemble agrees with the bag it draws.
#[derive(Debug, Clone)]
pub struct PolicyEnsemble<P> {
    bags: Vec<P>,
}

impl<P> PolicyEnsemble<P> {
    /// Fails with [`Error::Empty`] if `bags` is empty.
    pub fn new(bags: Vec<P>) -> Result<Self> {
        if bags.is_empty() {
            return Err(Error::Empty("policy ensemble"));
        }
        Ok(Self { bags })
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    pub fn bags(&self) -> &[P] {
        &self.bags
    }
}

impl<C: ?Sized, P: ContextMapper<C>> ContextMapper<C> for PolicyEnsemble<P> {
    type Value = Vec<P::Value>;
    type State = Vec<P::State>;

    fn map_context(&self, context: &C) -> Result<PolicyDecision<Self::Value, Self::State>> {
        let mut values = Vec::with_capacity(self.bags.len());
        let mut states = Vec::with_capacity(self.bags.len());
        for bag in &self.bags {
            let d = bag.map_context(context)?;
            values.push(d.value);
            states.push(d.state);
        }
        Ok(PolicyDecision::new(values, states))
    }
}

/// Supplies the number of actions available for a context.
pub trait NumberOfActionsProvider<C: ?Sized> {
    fn number_of_actions(&self, context: &C) -> u32;
}

/// The same action count for every context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantActions(pub u32);

impl<C: ?Sized> NumberOfActionsProvider<C> for ConstantActions {
    fn number_of_actions(&self, _context: &C) -> u32 {
        self.0
    }
}

/// Context-dependent action count backed by a closure.
pub struct FnActions<F>(pub F);

impl<C: ?Sized, F: Fn(&C) -> u32> NumberOfActionsProvider<C> for FnActions<F> {
    fn number_of_actions(&self, context: &C) -> u32 {
        (self.0)(context)
    }
}
