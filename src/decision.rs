//! Decision envelopes: what a policy proposed, what the explorer did, and what must
//! be logged for unbiased offline evaluation.
//!
//! All values here are immutable snapshots taken at decision time. They are meant to
//! be:
//! - logged (through a [`Recorder`](crate::Recorder))
//! - replayed (offline policy evaluation needs the recorded probability)
//! - serialized by an outer transport layer (feature `serde`; short wire names)
//!
//! Action ids are 1-based everywhere in this module.

use std::fmt;

/// One entry of an explicit categorical distribution over actions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProbability {
    /// 1-based action id.
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    pub action: u32,
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
}

impl ActionProbability {
    pub fn new(action: u32, probability: f64) -> Self {
        Self {
            action,
            probability,
        }
    }
}

/// Output of a policy/model for one context.
///
/// `state` is opaque to explorers (e.g. the model version that produced `value`); it
/// is carried through to the recorder untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyDecision<V, S = ()> {
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    pub value: V,
    #[cfg_attr(feature = "serde", serde(rename = "s"))]
    pub state: S,
}

impl<V, S> PolicyDecision<V, S> {
    pub fn new(value: V, state: S) -> Self {
        Self { value, state }
    }
}

impl<V> PolicyDecision<V, ()> {
    /// A decision with no policy state.
    pub fn from_value(value: V) -> Self {
        Self { value, state: () }
    }
}

/// State for explorers that only need the chosen action's probability.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericState {
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
}

/// Epsilon-greedy state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedyState {
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
    /// Epsilon in effect for this call (0 when exploration was disabled).
    #[cfg_attr(feature = "serde", serde(rename = "e"))]
    pub epsilon: f64,
    /// True only when the explore branch drew the action.
    #[cfg_attr(feature = "serde", serde(rename = "isExplore"))]
    pub is_explore: bool,
}

/// Tau-first state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TauFirstState {
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
    /// Exploration budget observed by this call, before its own decrement.
    #[cfg_attr(feature = "serde", serde(rename = "t"))]
    pub tau: u64,
    #[cfg_attr(feature = "serde", serde(rename = "isExplore"))]
    pub is_explore: bool,
}

/// Epsilon-greedy slate state.
///
/// `ranking` is the default ranker's output, kept even when a random permutation
/// was shown, so an evaluator can recover what exploitation would have shown.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedySlateState {
    /// Marginal probability of the returned top action.
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
    #[cfg_attr(feature = "serde", serde(rename = "e"))]
    pub epsilon: f64,
    #[cfg_attr(feature = "serde", serde(rename = "r"))]
    pub ranking: Vec<u32>,
    #[cfg_attr(feature = "serde", serde(rename = "isExplore"))]
    pub is_explore: bool,
}

/// State of a top-slot draw from an explicit distribution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopSlotDistributionState {
    /// Probability of the action placed in the top slot.
    #[cfg_attr(feature = "serde", serde(rename = "p"))]
    pub probability: f64,
    /// The full distribution, aligned with the input action order.
    #[cfg_attr(feature = "serde", serde(rename = "ps"))]
    pub probabilities: Vec<f64>,
}

/// What an explorer recorded about one decision.
///
/// Every variant carries the probability with which the returned action (or, for
/// rankings, the returned top action) was selected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplorerState {
    Generic(GenericState),
    EpsilonGreedy(EpsilonGreedyState),
    TauFirst(TauFirstState),
    EpsilonGreedySlate(EpsilonGreedySlateState),
    TopSlotDistribution(TopSlotDistributionState),
}

impl ExplorerState {
    /// Probability with which the returned action was drawn.
    pub fn probability(&self) -> f64 {
        match self {
            ExplorerState::Generic(s) => s.probability,
            ExplorerState::EpsilonGreedy(s) => s.probability,
            ExplorerState::TauFirst(s) => s.probability,
            ExplorerState::EpsilonGreedySlate(s) => s.probability,
            ExplorerState::TopSlotDistribution(s) => s.probability,
        }
    }

    /// Whether the draw was exploration, for explorers that distinguish it.
    pub fn is_explore(&self) -> Option<bool> {
        match self {
            ExplorerState::EpsilonGreedy(s) => Some(s.is_explore),
            ExplorerState::TauFirst(s) => Some(s.is_explore),
            ExplorerState::EpsilonGreedySlate(s) => Some(s.is_explore),
            ExplorerState::Generic(_) | ExplorerState::TopSlotDistribution(_) => None,
        }
    }
}

impl From<GenericState> for ExplorerState {
    fn from(s: GenericState) -> Self {
        ExplorerState::Generic(s)
    }
}

impl From<EpsilonGreedyState> for ExplorerState {
    fn from(s: EpsilonGreedyState) -> Self {
        ExplorerState::EpsilonGreedy(s)
    }
}

impl From<TauFirstState> for ExplorerState {
    fn from(s: TauFirstState) -> Self {
        ExplorerState::TauFirst(s)
    }
}

impl From<EpsilonGreedySlateState> for ExplorerState {
    fn from(s: EpsilonGreedySlateState) -> Self {
        ExplorerState::EpsilonGreedySlate(s)
    }
}

impl From<TopSlotDistributionState> for ExplorerState {
    fn from(s: TopSlotDistributionState) -> Self {
        ExplorerState::TopSlotDistribution(s)
    }
}

impl fmt::Display for ExplorerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorerState::Generic(s) => write!(f, "p={}", s.probability),
            ExplorerState::EpsilonGreedy(s) => write!(
                f,
                "p={} e={} explore={}",
                s.probability, s.epsilon, s.is_explore
            ),
            ExplorerState::TauFirst(s) => write!(
                f,
                "p={} t={} explore={}",
                s.probability, s.tau, s.is_explore
            ),
            ExplorerState::EpsilonGreedySlate(s) => write!(
                f,
                "p={} e={} r={:?} explore={}",
                s.probability, s.epsilon, s.ranking, s.is_explore
            ),
            ExplorerState::TopSlotDistribution(s) => {
                write!(f, "p={} ps={:?}", s.probability, s.probabilities)
            }
        }
    }
}

/// Result of one exploration step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplorerDecision<V> {
    /// Chosen action (1-based) or ranking.
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    pub value: V,
    #[cfg_attr(feature = "serde", serde(rename = "es"))]
    pub state: ExplorerState,
    /// False only when no randomization happened and there is nothing to correct
    /// for offline (e.g. tau-first after its budget is spent).
    #[cfg_attr(feature = "serde", serde(rename = "rec"))]
    pub should_record: bool,
}

impl<V> ExplorerDecision<V> {
    pub fn new(value: V, state: impl Into<ExplorerState>, should_record: bool) -> Self {
        Self {
            value,
            state: state.into(),
            should_record,
        }
    }

    /// Shorthand for a decision that must be recorded.
    pub fn recorded(value: V, state: impl Into<ExplorerState>) -> Self {
        Self::new(value, state, true)
    }

    pub fn probability(&self) -> f64 {
        self.state.probability()
    }

    /// Replace the value, keeping state and record flag.
    pub fn map_value<U>(self, f: impl FnOnce(V) -> U) -> ExplorerDecision<U> {
        ExplorerDecision {
            value: f(self.value),
            state: self.state,
            should_record: self.should_record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_reachable_from_every_variant() {
        let states: Vec<ExplorerState> = vec![
            GenericState { probability: 0.1 }.into(),
            EpsilonGreedyState {
                probability: 0.2,
                epsilon: 0.3,
                is_explore: true,
            }
            .into(),
            TauFirstState {
                probability: 0.3,
                tau: 4,
                is_explore: true,
            }
            .into(),
            EpsilonGreedySlateState {
                probability: 0.4,
                epsilon: 0.1,
                ranking: vec![2, 1],
                is_explore: false,
            }
            .into(),
            TopSlotDistributionState {
                probability: 0.5,
                probabilities: vec![0.5, 0.5],
            }
            .into(),
        ];
        let ps: Vec<f64> = states.iter().map(ExplorerState::probability).collect();
        assert_eq!(ps, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(states[0].is_explore(), None);
        assert_eq!(states[1].is_explore(), Some(true));
        assert_eq!(states[3].is_explore(), Some(false));
    }

    #[test]
    fn map_value_keeps_state_and_flag() {
        let d = ExplorerDecision::new(3u32, GenericState { probability: 0.25 }, false);
        let d2 = d.map_value(|a| vec![a]);
        assert_eq!(d2.value, vec![3]);
        assert_eq!(d2.probability(), 0.25);
        assert!(!d2.should_record);
    }

    #[test]
    fn display_is_compact() {
        let s: ExplorerState = EpsilonGreedyState {
            probability: 0.8,
            epsilon: 0.3,
            is_explore: false,
        }
        .into();
        assert_eq!(s.to_string(), "p=0.8 e=0.3 explore=false");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_names_are_short() {
        let s = EpsilonGreedyState {
            probability: 0.5,
            epsilon: 0.25,
            is_explore: true,
        };
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"p": 0.5, "e": 0.25, "isExplore": true})
        );

        let slate = EpsilonGreedySlateState {
            probability: 0.5,
            epsilon: 0.5,
            ranking: vec![3, 1, 2],
            is_explore: false,
        };
        let json = serde_json::to_value(&slate).unwrap();
        assert_eq!(json["r"], serde_json::json!([3, 1, 2]));

        let d = ExplorerDecision::recorded(2u32, GenericState { probability: 1.0 });
        let back: ExplorerDecision<u32> =
            serde_json::from_str(&serde_json::to_string(&d).unwrap()).unwrap();
        assert_eq!(back, d);
    }
}
