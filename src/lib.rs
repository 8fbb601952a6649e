//! `mwt`: deterministic contextual-bandit exploration ("multi-world testing").
//!
//! Given a context and a set of candidate actions, pick an action (or a ranking of
//! actions) with a pluggable exploration algorithm, and record the exact probability
//! with which it was picked so the interaction can be used for unbiased offline
//! policy evaluation later.
//!
//! **Goals:**
//! - **Reproducible**: every decision is a pure function of
//!   `(application id, event key, context, configuration)`. The seed is
//!   `hash(app) + hash(key)`; no process-wide RNG exists.
//! - **Honest probabilities**: the probability attached to a decision is the one the
//!   algorithm actually drew with.
//! - **One abstraction per axis**: a policy is a [`ContextMapper`]; an exploration
//!   algorithm is an [`Explorer`]. Single actions and rankings differ only in the
//!   associated `Value` type.
//!
//! **Explorers:**
//! - [`EpsilonGreedyExplorer`], [`TauFirstExplorer`], [`SoftmaxExplorer`],
//!   [`GenericExplorer`], [`BootstrapExplorer`]: one action from `N`.
//! - [`EpsilonGreedySlateExplorer`], [`SoftmaxSampleWithoutReplacementExplorer`],
//!   [`GenericSampleWithoutReplacementExplorer`], [`TopSlotBootstrapExplorer`]:
//!   whole rankings.
//! - [`TopSlotExplorer`]: any single-action explorer applied to the top slot of a
//!   ranking.
//! - [`PermutationExplorer`], [`UniformRandomExploration`]: full exploration when
//!   there is no policy yet.
//! - [`EpsilonGreedyInitialExplorer`], [`UniformRandomInitialExplorer`] +
//!   [`GenericTopSlotExplorer`] (see [`InitialExploration`]): explore around a
//!   caller-supplied default ranking before any model exists.
//!
//! **Orchestration:** [`MwtExplorer`] derives the seed, chooses the decision source
//! (policy, a caller-supplied default, initial explorer, full explorer), and hands
//! record-worthy decisions to a [`Recorder`].
//!
//! Action ids are 1-based `u32` everywhere in the public API.
//!
//! **Non-goals:**
//! - No transport, upload batching, or model hosting. Those live behind
//!   [`Recorder`] and [`ContextMapper`].
//! - No training.
//!
//! # Example
//!
//! ```rust
//! use mwt::{
//!     ConstantActions, EpsilonGreedyExplorer, FixedPolicy, MwtExplorer, StringRecorder,
//! };
//!
//! let mwt = MwtExplorer::<str, _, _, _>::builder(
//!     "app",
//!     StringRecorder::new(),
//!     EpsilonGreedyExplorer::new(0.3)?,
//! )
//! .policy(FixedPolicy::new(2u32))
//! .num_actions(ConstantActions(3))
//! .build()?;
//!
//! let action = mwt.choose_action("e1", "user=42")?;
//! assert_eq!(action, mwt.choose_action("e1", "user=42")?);
//! assert!(mwt.recorder().take_recording(false).starts_with("2 e1 "));
//! # Ok::<(), mwt::Error>(())
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod prg;
pub use prg::*;

mod stable_hash;
pub use stable_hash::*;

mod decision;
pub use decision::*;

mod actions;
pub use actions::*;

mod sampling;
pub use sampling::*;

mod policy;
pub use policy::*;

mod explorer;
pub use explorer::*;

mod epsilon_greedy;
pub use epsilon_greedy::*;

mod tau_first;
pub use tau_first::*;

mod bootstrap;
pub use bootstrap::*;

mod softmax;
pub use softmax::*;

mod generic;
pub use generic::*;

mod permutation;
pub use permutation::*;

mod slate;
pub use slate::*;

mod top_slot;
pub use top_slot::*;

mod initial;
pub use initial::*;

mod recorder;
pub use recorder::*;

mod mwt;
pub use crate::mwt::*;
