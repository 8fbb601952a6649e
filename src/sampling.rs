//! Weighted draws over action vectors.
//!
//! Indices here are 0-based positions into the weight vector; callers convert to
//! 1-based action ids. Weights need not sum to 1: they are normalized against their
//! total, and the probability returned alongside an index is the normalized weight
//! that index was actually drawn with.

use crate::{Error, Prg, Result};

/// Validate a weight vector: finite, non-negative, with a positive total.
///
/// Returns the total.
pub fn validate_weights(weights: &[f64]) -> Result<f64> {
    if weights.is_empty() {
        return Err(Error::Empty("weights"));
    }
    let mut total = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight.is_nan() || weight < 0.0 {
            return Err(Error::NegativeWeight { index, weight });
        }
        if !weight.is_finite() {
            return Err(Error::NonFinite {
                name: "weight",
                value: weight,
            });
        }
        total += weight;
    }
    if total <= 0.0 {
        return Err(Error::ZeroWeights);
    }
    Ok(total)
}

/// Inverse-CDF draw of one index given a uniform `draw` in `[0, 1)`.
///
/// `weights` must already be validated and `total` must be their sum. Returns the
/// chosen index and its normalized probability.
pub fn sample_index(weights: &[f64], total: f64, draw: f64) -> (usize, f64) {
    let mut cdf = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        let p = w / total;
        cdf += p;
        if cdf > draw {
            return (i, p);
        }
    }
    // Numerical fallback: rounding left the cdf a hair under the draw.
    let i = weights.iter().rposition(|&w| w > 0.0).unwrap_or(weights.len() - 1);
    (i, weights[i] / total)
}

/// Draw one index from `weights` using one uniform draw from `prg`.
pub fn sample_weighted(weights: &[f64], prg: &mut Prg) -> Result<(usize, f64)> {
    let total = validate_weights(weights)?;
    let draw = prg.uniform_unit_interval();
    Ok(sample_index(weights, total, draw))
}

/// Index of the largest value; ties go to the first occurrence.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// The arg-max index first, then every other index in ascending order.
///
/// This is the deterministic ranking used when exploration is off.
pub fn argmax_ordering(values: &[f64]) -> Option<Vec<usize>> {
    let best = argmax(values)?;
    let mut order = Vec::with_capacity(values.len());
    order.push(best);
    order.extend((0..values.len()).filter(|&i| i != best));
    Some(order)
}

/// Order every index by repeated weighted draws without replacement.
///
/// Each round normalizes the remaining weights, draws one index, and removes it.
/// Indices whose weight is zero are never drawn while positive weight remains; they
/// are appended in index order at the end.
///
/// Returns the ordering and the probability of the first (top) selection. The first
/// draw is identical to [`sample_weighted`] on the same generator, so the top slot
/// agrees with the single-action draw.
pub fn sample_without_replacement(weights: &[f64], prg: &mut Prg) -> Result<(Vec<usize>, f64)> {
    validate_weights(weights)?;

    let mut remaining: Vec<usize> = (0..weights.len()).collect();
    let mut order = Vec::with_capacity(weights.len());
    let mut top_probability = 0.0;

    while !remaining.is_empty() {
        let w: Vec<f64> = remaining.iter().map(|&i| weights[i]).collect();
        let total: f64 = w.iter().sum();
        if total <= 0.0 {
            order.extend(remaining.drain(..));
            break;
        }
        let draw = prg.uniform_unit_interval();
        let (k, p) = sample_index(&w, total, draw);
        if order.is_empty() {
            top_probability = p;
        }
        order.push(remaining.remove(k));
    }

    Ok((order, top_probability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn weights_are_validated() {
        assert_eq!(validate_weights(&[]), Err(Error::Empty("weights")));
        assert_eq!(validate_weights(&[0.0, 0.0]), Err(Error::ZeroWeights));
        assert_eq!(
            validate_weights(&[1.0, -0.5]),
            Err(Error::NegativeWeight {
                index: 1,
                weight: -0.5
            })
        );
        assert!(validate_weights(&[f64::INFINITY]).is_err());
        assert!(validate_weights(&[f64::NAN]).is_err());
        assert_eq!(validate_weights(&[1.0, 3.0]).unwrap(), 4.0);
    }

    #[test]
    fn inverse_cdf_boundaries() {
        let w = [1.0, 0.0, 3.0];
        assert_eq!(sample_index(&w, 4.0, 0.0), (0, 0.25));
        assert_eq!(sample_index(&w, 4.0, 0.2499), (0, 0.25));
        assert_eq!(sample_index(&w, 4.0, 0.25), (2, 0.75));
        assert_eq!(sample_index(&w, 4.0, 0.999_999), (2, 0.75));
    }

    #[test]
    fn zero_weight_index_is_never_drawn() {
        let w = [0.0, 1.0, 0.0];
        for seed in 0..200u64 {
            let (i, p) = sample_weighted(&w, &mut Prg::new(seed)).unwrap();
            assert_eq!((i, p), (1, 1.0));
        }
    }

    #[test]
    fn argmax_breaks_ties_by_first_occurrence() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[-5.0, -2.0, -3.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_ordering_keeps_the_rest_in_index_order() {
        assert_eq!(argmax_ordering(&[0.1, 0.2, 0.9, 0.3]), Some(vec![2, 0, 1, 3]));
        assert_eq!(argmax_ordering(&[]), None);
    }

    #[test]
    fn zero_weights_trail_the_ordering() {
        let w = [0.0, 2.0, 0.0, 1.0];
        for seed in 0..50u64 {
            let (order, _) = sample_without_replacement(&w, &mut Prg::new(seed)).unwrap();
            assert_eq!(&order[2..], &[0, 2]);
        }
    }

    proptest! {
        #[test]
        fn ordering_is_a_permutation_and_top_matches_single_draw(
            weights in proptest::collection::vec(0.0f64..10.0, 1..12),
            seed in any::<u64>(),
        ) {
            prop_assume!(weights.iter().sum::<f64>() > 0.0);
            let (order, p_top) = sample_without_replacement(&weights, &mut Prg::new(seed)).unwrap();

            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..weights.len()).collect::<Vec<_>>());

            let (single, p_single) = sample_weighted(&weights, &mut Prg::new(seed)).unwrap();
            prop_assert_eq!(order[0], single);
            prop_assert_eq!(p_top, p_single);

            let total: f64 = weights.iter().sum();
            prop_assert!((p_top - weights[single] / total).abs() < 1e-12);
        }
    }
}
