//! Timed unit spawning

use rand::Rng;
use rand::seq::IndexedRandom;

use super::difficulty::DifficultyParams;
use super::state::{Unit, UnitLabel};
use crate::tuning::Tuning;

/// Countdown that emits units at the current spawn interval
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Seconds accumulated since the last spawn event
    pub timer: f32,
}

impl Spawner {
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Accumulate `dt` and emit the units of a spawn event once the interval
    /// has elapsed. `next_id` hands out fresh entity IDs.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        params: &DifficultyParams,
        tuning: &Tuning,
        rng: &mut R,
        mut next_id: impl FnMut() -> u32,
    ) -> Vec<Unit> {
        self.timer += dt;
        if self.timer <= params.spawn_interval {
            return Vec::new();
        }
        self.timer = 0.0;

        // One draw decides single vs dual spawn
        let dual = params.dual_spawn_chance > 0.0 && rng.random::<f32>() < params.dual_spawn_chance;
        let count = if dual { 2 } else { 1 };

        let half = params.lateral_spread / 2.0;
        (0..count)
            .map(|i| {
                let lateral = if half > 0.0 {
                    rng.random_range(-half..=half)
                } else {
                    0.0
                };
                let label = *UnitLabel::ALL.choose(rng).unwrap_or(&UnitLabel::Required);
                Unit {
                    id: next_id(),
                    lateral,
                    depth: tuning.spawn_depth - i as f32 * tuning.dual_spawn_stagger,
                    speed: params.speed,
                    label,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::parameters_for;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn counter() -> impl FnMut() -> u32 {
        let mut id = 0;
        move || {
            id += 1;
            id
        }
    }

    #[test]
    fn test_spawns_after_interval() {
        let tuning = Tuning::default();
        let params = parameters_for(0, &tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawner = Spawner::default();
        let mut ids = counter();

        assert!(spawner.advance(0.5, &params, &tuning, &mut rng, &mut ids).is_empty());
        assert!(spawner.advance(0.3, &params, &tuning, &mut rng, &mut ids).is_empty());
        let units = spawner.advance(0.2, &params, &tuning, &mut rng, &mut ids);
        assert_eq!(units.len(), 1);
        assert_eq!(spawner.timer, 0.0);

        let unit = &units[0];
        assert_eq!(unit.depth, tuning.spawn_depth);
        assert_eq!(unit.speed, params.speed);
        assert!(unit.lateral.abs() <= params.lateral_spread / 2.0);
    }

    #[test]
    fn test_low_score_never_dual_spawns() {
        let tuning = Tuning::default();
        let params = parameters_for(10, &tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::default();
        let mut ids = counter();

        for _ in 0..500 {
            let units = spawner.advance(1.0, &params, &tuning, &mut rng, &mut ids);
            assert_eq!(units.len(), 1);
        }
    }

    #[test]
    fn test_high_score_dual_spawns_are_staggered() {
        let tuning = Tuning::default();
        let params = parameters_for(100, &tuning);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = Spawner::default();
        let mut ids = counter();

        let mut duals = 0;
        for _ in 0..500 {
            let units = spawner.advance(1.0, &params, &tuning, &mut rng, &mut ids);
            if units.len() == 2 {
                duals += 1;
                assert_ne!(units[0].id, units[1].id);
                assert_eq!(units[0].depth - units[1].depth, tuning.dual_spawn_stagger);
            }
        }
        // ~30% of 500
        assert!(duals > 100 && duals < 220, "duals = {duals}");
    }

    #[test]
    fn test_lateral_stays_in_band() {
        let tuning = Tuning::default();
        let params = parameters_for(60, &tuning);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::default();
        let mut ids = counter();

        for _ in 0..1000 {
            for unit in spawner.advance(1.0, &params, &tuning, &mut rng, &mut ids) {
                assert!(unit.lateral.abs() <= params.lateral_spread / 2.0);
            }
        }
    }
}
