/// Convex decay from 1.0 at `delta == 0`; anything at or past `max_delta` earns nothing.
///
/// `1 - (2^(delta * steepness / max_delta + 2) - 4) / divisor`
fn convex_decay(delta: f64, max_delta: f64, steepness: f64, divisor: f64) -> f64 {
    if delta >= max_delta {
        return 0.0;
    }
    let exponent = delta * (steepness / max_delta) + 2.0;
    1.0 - (2f64.powf(exponent) - 4.0) / divisor
}

/// Falls from 1.0 to exactly 0.0 as the difference approaches the target itself
pub fn playing_time_curve(delta: f64, max_delta: f64) -> f64 {
    convex_decay(delta, max_delta, 3.0, 28.0)
}

/// Falls from 1.0 to 0.25 just below `max_delta`, then drops to 0.0
pub fn weight_curve(delta: f64, max_delta: f64) -> f64 {
    convex_decay(delta, max_delta, 2.0, 16.0)
}

/// Many plays of a game someone rated low wear the rating out; high ratings decay slowly
pub fn play_count_decay(rating: f64, play_count: u32) -> f64 {
    let scale = 2f64.powf(rating * 10.0);
    (-(f64::from(play_count)) / scale).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playing_time_curve_ends() {
        assert_eq!(playing_time_curve(0.0, 60.0), 1.0);
        assert_eq!(playing_time_curve(60.0, 60.0), 0.0);
        assert_eq!(playing_time_curve(90.0, 60.0), 0.0);
        assert!(playing_time_curve(59.999, 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_curves_never_increase() {
        let mut previous_time = f64::INFINITY;
        let mut previous_weight = f64::INFINITY;
        for step in 0..=300 {
            let delta = step as f64 / 100.0;
            let time = playing_time_curve(delta * 20.0, 60.0);
            let weight = weight_curve(delta, 2.5);
            assert!(time <= previous_time);
            assert!(weight <= previous_weight);
            previous_time = time;
            previous_weight = weight;
        }
    }

    #[test]
    fn test_weight_curve_values() {
        assert_eq!(weight_curve(0.0, 2.5), 1.0);
        assert!((weight_curve(1.25, 2.5) - 0.75).abs() < 1e-12);
        assert_eq!(weight_curve(2.5, 2.5), 0.0);
    }

    #[test]
    fn test_play_count_decay() {
        assert_eq!(play_count_decay(0.5, 0), 1.0);
        // rating 0.5 -> 32 plays per e-fold
        assert!((play_count_decay(0.5, 32) - (-1f64).exp()).abs() < 1e-12);
        assert!(play_count_decay(0.9, 10) > play_count_decay(0.3, 10));
    }
}
