use super::types::SubScore;

const DECIMALS_SCALE: f64 = 10_000.0;

/// Round to 4 decimals and force into 0.0..=1.0
pub fn standardize(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let rounded = (value * DECIMALS_SCALE).round() / DECIMALS_SCALE;
    rounded.clamp(0.0, 1.0)
}

/// Weighted mean of the sub-scores, 0.0 when nothing carries weight
pub fn weighted_average(scores: &[SubScore]) -> f64 {
    let total_weight: f64 = scores.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted_sum: f64 = scores.iter().map(|s| s.raw * s.weight).sum();
    weighted_sum / total_weight
}
