/// Seed value given to all-zero sibling weights before a proportional rescale.
pub(crate) const WEIGHT_EPSILON: f64 = 1e-6;

pub(crate) fn saturate_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Return the weights to a unit sum: uniform when they are all zero, proportional otherwise.
pub(crate) fn renormalize(weights: &mut [f64]) {
    if weights.is_empty() {
        return;
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        let uniform = 1.0 / weights.len() as f64;
        weights.iter_mut().for_each(|w| *w = uniform);
        return;
    }
    weights.iter_mut().for_each(|w| *w /= sum);
}

/// Pin `weights[idx]` to `value` and scale every other entry by `(1 - value) / sum(others)`.
pub(crate) fn pin_weight(weights: &mut [f64], idx: usize, value: f64) {
    if weights.len() == 1 {
        weights[0] = 1.0;
        return;
    }
    let value = value.clamp(0.0, 1.0);
    let others = |ws: &[f64]| -> f64 {
        ws.iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, w)| *w)
            .sum()
    };

    if others(weights) <= 0.0 {
        for (i, w) in weights.iter_mut().enumerate() {
            if i != idx {
                *w = WEIGHT_EPSILON;
            }
        }
    }

    let factor = (1.0 - value) / others(weights);
    for (i, w) in weights.iter_mut().enumerate() {
        if i == idx {
            *w = value;
        } else {
            *w *= factor;
        }
    }
}

pub(crate) fn uniform(weights: &mut [f64]) {
    if weights.is_empty() {
        return;
    }
    let u = 1.0 / weights.len() as f64;
    weights.iter_mut().for_each(|w| *w = u);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
