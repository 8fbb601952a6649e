//! Softmax exploration over a score vector.
//!
//! Scores become weights `exp(lambda * s_i - max_j(lambda * s_j))`; for positive
//! `lambda` this is the usual max-shifted softmax, and the shift keeps the largest
//! weight at exactly 1 for any sign of `lambda`. `lambda = 0` is uniform.

use crate::actions::{resolve_num_actions, validate_num_actions};
use crate::sampling::{argmax, argmax_ordering, sample_weighted, sample_without_replacement};
use crate::{Error, ExploreSwitch, Explorer, ExplorerDecision, GenericState, Prg, Result};

fn validate_lambda(lambda: f64) -> Result<f64> {
    if !lambda.is_finite() {
        return Err(Error::NonFinite {
            name: "lambda",
            value: lambda,
        });
    }
    Ok(lambda)
}

/// Check the score vector against the action count.
fn check_scores(scores: &[f64], num_actions: u32) -> Result<()> {
    if scores.len() != num_actions as usize {
        return Err(Error::LengthMismatch {
            expected: num_actions as usize,
            actual: scores.len(),
        });
    }
    if let Some(&bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(Error::NonFinite {
            name: "score",
            value: bad,
        });
    }
    Ok(())
}

/// Unnormalized softmax weights for `scores`.
pub fn softmax_weights(scores: &[f64], lambda: f64) -> Result<Vec<f64>> {
    let scaled: Vec<f64> = scores.iter().map(|s| lambda * s).collect();
    if let Some(&bad) = scaled.iter().find(|z| !z.is_finite()) {
        return Err(Error::NonFinite {
            name: "scaled score",
            value: bad,
        });
    }
    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(scaled.iter().map(|z| (z - max).exp()).collect())
}

/// Single-action softmax explorer.
#[derive(Debug, Clone)]
pub struct SoftmaxExplorer {
    lambda: f64,
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl SoftmaxExplorer {
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: validate_lambda(lambda)?,
            num_actions: None,
            explore: ExploreSwitch::new(),
        })
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn choose(&self, prg: &mut Prg, scores: &[f64], num_actions: u32) -> Result<ExplorerDecision<u32>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        check_scores(scores, n)?;

        let (index, probability) = if self.explore.is_enabled() {
            sample_weighted(&softmax_weights(scores, self.lambda)?, prg)?
        } else {
            (argmax(scores).ok_or(Error::Empty("scores"))?, 1.0)
        };
        Ok(ExplorerDecision::recorded(
            index as u32 + 1,
            GenericState { probability },
        ))
    }
}

impl Explorer for SoftmaxExplorer {
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

/// Softmax ranking: draw every slot without replacement.
///
/// The recorded probability is that of the top slot, which is the same draw
/// [`SoftmaxExplorer`] makes for the same seed.
#[derive(Debug, Clone)]
pub struct SoftmaxSampleWithoutReplacementExplorer {
    lambda: f64,
    num_actions: Option<u32>,
    explore: ExploreSwitch,
}

impl SoftmaxSampleWithoutReplacementExplorer {
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: validate_lambda(lambda)?,
            num_actions: None,
            explore: ExploreSwitch::new(),
        })
    }

    pub fn with_num_actions(mut self, num_actions: u32) -> Result<Self> {
        self.num_actions = Some(validate_num_actions(num_actions)?);
        Ok(self)
    }

    pub fn choose(
        &self,
        prg: &mut Prg,
        scores: &[f64],
        num_actions: u32,
    ) -> Result<ExplorerDecision<Vec<u32>>> {
        let n = resolve_num_actions(self.num_actions, num_actions)?;
        check_scores(scores, n)?;

        let (order, probability) = if self.explore.is_enabled() {
            sample_without_replacement(&softmax_weights(scores, self.lambda)?, prg)?
        } else {
            (argmax_ordering(scores).ok_or(Error::Empty("scores"))?, 1.0)
        };
        let ranking = order.into_iter().map(|i| i as u32 + 1).collect();
        Ok(ExplorerDecision::recorded(ranking, GenericState { probability }))
    }
}

impl Explorer for SoftmaxSampleWithoutReplacementExplorer {
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
