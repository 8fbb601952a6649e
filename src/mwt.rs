//! The top-level orchestrator.
//!
//! [`MwtExplorer`] binds an application id, an explorer, and a recorder. Each call
//! derives a seed from `(application id, event key)`, picks a decision source, and
//! records the outcome when the explorer asks for it.
//!
//! Decision sources, in order:
//! 1. the trained policy, if one is installed, fed through the configured explorer;
//! 2. a default policy output or default policy passed by the caller, fed through the
//!    configured explorer in place of the trained policy;
//! 3. the initial explorer, if configured and the caller passed a default value;
//! 4. the initial full explorer, if configured;
//! 5. otherwise [`Error::NoDecisionSource`].
//!
//! Without an action-count provider explorers see a count of 0. Those that do not
//! pin their own count then fail with [`Error::MissingCapability`].
//!
//! The policy can be swapped while other threads are deciding; a call in flight keeps
//! the policy it started with.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    compute_id_hash, ContextMapper, Error, Explorer, ExplorerState, FallbackExplorer,
    FullExplorer, NumberOfActionsProvider, Prg, Recorder, Result,
};

type SharedPolicy<C, V, S> = Arc<dyn ContextMapper<C, Value = V, State = S> + Send + Sync>;
type BoxedActions<C> = Box<dyn NumberOfActionsProvider<C> + Send + Sync>;
type BoxedFull<V> = Box<dyn FullExplorer<Value = V> + Send + Sync>;
type BoxedFallback<V> = Box<dyn FallbackExplorer<V> + Send + Sync>;

/// Which path produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionSource {
    Policy,
    /// The caller's default policy output, explored like a policy's.
    DefaultDecision,
    /// The caller's default policy.
    DefaultPolicy,
    InitialExplorer,
    FullExplorer,
}

/// Everything known about one decision, before recording.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MwtDecision<V, S> {
    pub value: V,
    pub explorer_state: ExplorerState,
    /// `None` when no policy was consulted.
    pub policy_state: Option<S>,
    pub should_record: bool,
    pub seed: u64,
    pub source: DecisionSource,
}

impl<V, S> MwtDecision<V, S> {
    pub fn probability(&self) -> f64 {
        self.explorer_state.probability()
    }
}

/// Multi-world-testing orchestrator.
///
/// - `C`: context type (may be unsized, e.g. `str`)
/// - `E`: explorer applied to the policy's output
/// - `S`: policy state carried to the recorder
/// - `R`: recorder
pub struct MwtExplorer<C: ?Sized, E: Explorer, S, R> {
    app_id: String,
    app_hash: u64,
    recorder: R,
    explorer: E,
    policy: RwLock<Option<SharedPolicy<C, E::PolicyValue, S>>>,
    num_actions: Option<BoxedActions<C>>,
    initial_full_explorer: Option<BoxedFull<E::Value>>,
    initial_explorer: Option<BoxedFallback<E::Value>>,
}

impl<C: ?Sized, E: Explorer, S, R> MwtExplorer<C, E, S, R> {
    pub fn builder(
        app_id: impl Into<String>,
        recorder: R,
        explorer: E,
    ) -> MwtExplorerBuilder<C, E, S, R> {
        MwtExplorerBuilder {
            app_id: app_id.into(),
            recorder,
            explorer,
            policy: None,
            num_actions: None,
            initial_full_explorer: None,
            initial_explorer: None,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The explorer, e.g. to call [`Explorer::enable_explore`].
    pub fn explorer(&self) -> &E {
        &self.explorer
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn has_policy(&self) -> bool {
        self.policy.read().is_some()
    }

    /// Install or replace the trained policy.
    pub fn update_policy<P>(&self, policy: P)
    where
        P: ContextMapper<C, Value = E::PolicyValue, State = S> + Send + Sync + 'static,
    {
        *self.policy.write() = Some(Arc::new(policy));
        log::debug!("policy updated for app {}", self.app_id);
    }

    /// Remove the trained policy; decisions fall back to the initial explorers.
    pub fn clear_policy(&self) {
        *self.policy.write() = None;
        log::debug!("policy cleared for app {}", self.app_id);
    }

    /// The seed used for `event_key`.
    pub fn seed_for(&self, event_key: &str) -> u64 {
        self.app_hash.wrapping_add(compute_id_hash(event_key))
    }

    /// Decide without recording.
    pub fn decide(
        &self,
        event_key: &str,
        context: &C,
        default_value: Option<&E::Value>,
    ) -> Result<MwtDecision<E::Value, S>> {
        let (seed, mut prg, num_actions) = self.start(event_key, context);

        if let Some(policy) = self.current_policy() {
            let pd = policy.map_context(context)?;
            return self.explore(
                &mut prg,
                seed,
                &pd.value,
                Some(pd.state),
                num_actions,
                DecisionSource::Policy,
            );
        }

        if let (Some(initial), Some(default_value)) = (&self.initial_explorer, default_value) {
            let d = initial
                .explore_default(&mut prg, default_value, num_actions)
                .map_err(|e| self.missing_count(e))?;
            return Ok(MwtDecision {
                value: d.value,
                explorer_state: d.state,
                policy_state: None,
                should_record: d.should_record,
                seed,
                source: DecisionSource::InitialExplorer,
            });
        }

        if let Some(full) = &self.initial_full_explorer {
            let d = full.explore(&mut prg, num_actions)?;
            return Ok(MwtDecision {
                value: d.value,
                explorer_state: d.state,
                policy_state: None,
                should_record: d.should_record,
                seed,
                source: DecisionSource::FullExplorer,
            });
        }

        Err(Error::NoDecisionSource)
    }

    /// Decide without recording; while no policy is installed, `default_decision`
    /// stands in for the policy's output and goes through the configured explorer.
    pub fn decide_with_default_decision(
        &self,
        event_key: &str,
        context: &C,
        default_decision: &E::PolicyValue,
    ) -> Result<MwtDecision<E::Value, S>> {
        let (seed, mut prg, num_actions) = self.start(event_key, context);
        match self.current_policy() {
            Some(policy) => {
                let pd = policy.map_context(context)?;
                self.explore(
                    &mut prg,
                    seed,
                    &pd.value,
                    Some(pd.state),
                    num_actions,
                    DecisionSource::Policy,
                )
            }
            None => self.explore(
                &mut prg,
                seed,
                default_decision,
                None,
                num_actions,
                DecisionSource::DefaultDecision,
            ),
        }
    }

    /// Decide without recording; while no policy is installed, `default_policy` is
    /// consulted instead and its state is carried like a trained policy's.
    pub fn decide_with_default_policy<M>(
        &self,
        event_key: &str,
        context: &C,
        default_policy: &M,
    ) -> Result<MwtDecision<E::Value, S>>
    where
        M: ContextMapper<C, Value = E::PolicyValue, State = S> + ?Sized,
    {
        let (seed, mut prg, num_actions) = self.start(event_key, context);
        let (pd, source) = match self.current_policy() {
            Some(policy) => (policy.map_context(context)?, DecisionSource::Policy),
            None => (default_policy.map_context(context)?, DecisionSource::DefaultPolicy),
        };
        self.explore(&mut prg, seed, &pd.value, Some(pd.state), num_actions, source)
    }

    fn start(&self, event_key: &str, context: &C) -> (u64, Prg, u32) {
        let seed = self.seed_for(event_key);
        let num_actions = self
            .num_actions
            .as_ref()
            .map_or(0, |p| p.number_of_actions(context));
        (seed, Prg::new(seed), num_actions)
    }

    // Clone the Arc so the lock is not held across the policy call.
    fn current_policy(&self) -> Option<SharedPolicy<C, E::PolicyValue, S>> {
        self.policy.read().clone()
    }

    fn explore(
        &self,
        prg: &mut Prg,
        seed: u64,
        policy_value: &E::PolicyValue,
        policy_state: Option<S>,
        num_actions: u32,
        source: DecisionSource,
    ) -> Result<MwtDecision<E::Value, S>> {
        let d = self
            .explorer
            .map_context(prg, policy_value, num_actions)
            .map_err(|e| self.missing_count(e))?;
        Ok(MwtDecision {
            value: d.value,
            explorer_state: d.state,
            policy_state,
            should_record: d.should_record,
            seed,
            source,
        })
    }

    /// With no provider every explorer sees a count of 0; unless it pins its own
    /// count that is a wiring problem, not a bad argument.
    fn missing_count(&self, err: Error) -> Error {
        match err {
            Error::InvalidNumberOfActions(0) if self.num_actions.is_none() => {
                Error::MissingCapability("number of actions provider")
            }
            other => other,
        }
    }
}

impl<C, E, S, R> MwtExplorer<C, E, S, R>
where
    C: ?Sized,
    E: Explorer,
    R: Recorder<C, E::Value, S>,
{
    /// Decide for `event_key` and record if the explorer asks for it.
    pub fn choose_action(&self, event_key: &str, context: &C) -> Result<E::Value> {
        let d = self.decide(event_key, context, None)?;
        Ok(self.record(event_key, context, d))
    }

    /// Like [`choose_action`](Self::choose_action), with a default value for the
    /// initial explorer to work from while no policy is installed.
    pub fn choose_action_with_default(
        &self,
        event_key: &str,
        context: &C,
        default_value: &E::Value,
    ) -> Result<E::Value> {
        let d = self.decide(event_key, context, Some(default_value))?;
        Ok(self.record(event_key, context, d))
    }

    /// Recording counterpart of [`decide_with_default_decision`](Self::decide_with_default_decision).
    pub fn choose_action_with_default_decision(
        &self,
        event_key: &str,
        context: &C,
        default_decision: &E::PolicyValue,
    ) -> Result<E::Value> {
        let d = self.decide_with_default_decision(event_key, context, default_decision)?;
        Ok(self.record(event_key, context, d))
    }

    /// Recording counterpart of [`decide_with_default_policy`](Self::decide_with_default_policy).
    pub fn choose_action_with_default_policy<M>(
        &self,
        event_key: &str,
        context: &C,
        default_policy: &M,
    ) -> Result<E::Value>
    where
        M: ContextMapper<C, Value = E::PolicyValue, State = S> + ?Sized,
    {
        let d = self.decide_with_default_policy(event_key, context, default_policy)?;
        Ok(self.record(event_key, context, d))
    }

    fn record(&self, event_key: &str, context: &C, d: MwtDecision<E::Value, S>) -> E::Value {
        if d.should_record {
            self.recorder.record(
                context,
                &d.value,
                &d.explorer_state,
                d.policy_state.as_ref(),
                event_key,
            );
            log::debug!(
                "recorded {event_key} via {:?} p={}",
                d.source,
                d.probability()
            );
        }
        d.value
    }
}

impl<C: ?Sized, E: Explorer, S, R> fmt::Debug for MwtExplorer<C, E, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MwtExplorer")
            .field("app_id", &self.app_id)
            .field("has_policy", &self.has_policy())
            .field("num_actions", &self.num_actions.is_some())
            .field("initial_explorer", &self.initial_explorer.is_some())
            .field("initial_full_explorer", &self.initial_full_explorer.is_some())
            .finish()
    }
}

/// Wiring for [`MwtExplorer`]; validated by [`build`](Self::build).
pub struct MwtExplorerBuilder<C: ?Sized, E: Explorer, S, R> {
    app_id: String,
    recorder: R,
    explorer: E,
    policy: Option<SharedPolicy<C, E::PolicyValue, S>>,
    num_actions: Option<BoxedActions<C>>,
    initial_full_explorer: Option<BoxedFull<E::Value>>,
    initial_explorer: Option<BoxedFallback<E::Value>>,
}

impl<C: ?Sized, E: Explorer, S, R> MwtExplorerBuilder<C, E, S, R> {
    pub fn policy<P>(mut self, policy: P) -> Self
    where
        P: ContextMapper<C, Value = E::PolicyValue, State = S> + Send + Sync + 'static,
    {
        self.policy = Some(Arc::new(policy));
        self
    }

    pub fn num_actions<N>(mut self, provider: N) -> Self
    where
        N: NumberOfActionsProvider<C> + Send + Sync + 'static,
    {
        self.num_actions = Some(Box::new(provider));
        self
    }

    /// Fallback that explores around the caller's default value.
    pub fn initial_explorer<X>(mut self, explorer: X) -> Self
    where
        X: FallbackExplorer<E::Value> + Send + Sync + 'static,
    {
        self.initial_explorer = Some(Box::new(explorer));
        self
    }

    /// Fallback that explores with no input at all.
    pub fn initial_full_explorer<F>(mut self, explorer: F) -> Self
    where
        F: FullExplorer<Value = E::Value> + Send + Sync + 'static,
    {
        self.initial_full_explorer = Some(Box::new(explorer));
        self
    }

    /// Fails if both fallbacks are set, or if the full explorer has no action-count
    /// provider to draw from.
    pub fn build(self) -> Result<MwtExplorer<C, E, S, R>> {
        if self.initial_full_explorer.is_some() && self.initial_explorer.is_some() {
            return Err(Error::ConflictingFallbacks);
        }
        if self.initial_full_explorer.is_some() && self.num_actions.is_none() {
            return Err(Error::MissingCapability("number of actions provider"));
        }
        let app_hash = compute_id_hash(&self.app_id);
        log::debug!(
            "mwt explorer for app {} (policy: {})",
            self.app_id,
            self.policy.is_some()
        );
        Ok(MwtExplorer {
            app_id: self.app_id,
            app_hash,
            recorder: self.recorder,
            explorer: self.explorer,
            policy: RwLock::new(self.policy),
            num_actions: self.num_actions,
            initial_full_explorer: self.initial_full_explorer,
            initial_explorer: self.initial_explorer,
        })
    }
}
