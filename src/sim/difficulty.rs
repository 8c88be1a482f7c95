//! Score-driven difficulty ramp
//!
//! Pure functions only; consulted once per tick with the score as it stood at
//! the start of the tick.

use crate::tuning::Tuning;

/// Spawn and motion parameters for a given score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Fall speed given to newly spawned units (world units/s)
    pub speed: f32,
    /// Seconds between spawn events
    pub spawn_interval: f32,
    /// Spread in lane widths (capped)
    pub spread_multiplier: f32,
    /// Full width of the spawn band in world units
    pub lateral_spread: f32,
    /// Probability that a spawn event emits two units
    pub dual_spawn_chance: f32,
}

/// Difficulty parameters for `score`
pub fn parameters_for(score: u64, tuning: &Tuning) -> DifficultyParams {
    let s = score as f32;

    let speed = tuning.base_speed + s * tuning.speed_growth;

    let dynamic_interval = tuning.base_spawn_interval / (1.0 + s * tuning.spawn_rate_factor);
    let spawn_interval = dynamic_interval.max(tuning.min_spawn_interval);

    let spread_multiplier = (tuning.base_spread + s * tuning.spread_growth).min(tuning.max_spread);

    let dual_spawn_chance = if score > tuning.dual_spawn_threshold {
        tuning.dual_spawn_chance
    } else {
        0.0
    };

    DifficultyParams {
        speed,
        spawn_interval,
        spread_multiplier,
        lateral_spread: tuning.lane_width * spread_multiplier,
        dual_spawn_chance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_score_is_unramped() {
        let tuning = Tuning::default();
        let p = parameters_for(0, &tuning);
        assert_eq!(p.speed, tuning.base_speed);
        assert_eq!(p.spawn_interval, tuning.base_spawn_interval);
        assert_eq!(p.spread_multiplier, tuning.base_spread);
        assert_eq!(p.dual_spawn_chance, 0.0);
    }

    #[test]
    fn test_dual_spawn_threshold_is_exclusive() {
        let tuning = Tuning::default();
        assert_eq!(parameters_for(30, &tuning).dual_spawn_chance, 0.0);
        assert_eq!(parameters_for(31, &tuning).dual_spawn_chance, 0.3);
    }

    #[test]
    fn test_caps_and_floors() {
        let tuning = Tuning::default();
        let p = parameters_for(10_000, &tuning);
        assert_eq!(p.spawn_interval, tuning.min_spawn_interval);
        assert_eq!(p.spread_multiplier, tuning.max_spread);
        assert!((p.lateral_spread - 8.75).abs() < 1e-4);
        // Speed never caps
        assert!(p.speed > 4000.0);
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(a in 0u64..5_000, b in 0u64..5_000) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = parameters_for(lo, &tuning);
            let p_hi = parameters_for(hi, &tuning);

            prop_assert!(p_hi.speed >= p_lo.speed);
            prop_assert!(p_hi.spawn_interval <= p_lo.spawn_interval);
            prop_assert!(p_hi.lateral_spread >= p_lo.lateral_spread);
        }

        #[test]
        fn prop_difficulty_respects_bounds(score in any::<u64>()) {
            let tuning = Tuning::default();
            let p = parameters_for(score, &tuning);

            prop_assert!(p.spawn_interval >= tuning.min_spawn_interval);
            prop_assert!(p.spawn_interval <= tuning.base_spawn_interval);
            prop_assert!(p.spread_multiplier <= tuning.max_spread);
            prop_assert!(p.speed >= tuning.base_speed);
        }
    }
}
