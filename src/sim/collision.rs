//! Unit motion and catch/miss resolution
//!
//! Units only ever interact with the player, never with each other, so each
//! one resolves independently. A catch is checked before a miss.

use super::state::Unit;
use crate::tuning::Tuning;

/// How a single unit resolved this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFate {
    Caught,
    Missed,
    InFlight,
}

/// Catch box test followed by the miss test
pub fn classify(unit: &Unit, player_lateral: f32, tuning: &Tuning) -> UnitFate {
    let dx = (unit.lateral - player_lateral).abs();
    let dz = (unit.depth - tuning.player_depth).abs();

    if dx < tuning.catch_radius && dz < tuning.catch_radius {
        UnitFate::Caught
    } else if unit.depth > tuning.player_depth + tuning.miss_tolerance {
        UnitFate::Missed
    } else {
        UnitFate::InFlight
    }
}

/// Outcome of advancing the live set by one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No miss: `survivors` replaces the live set, `caught` were collected
    Advanced { survivors: Vec<Unit>, caught: Vec<Unit> },
    /// At least one unit got past the player; the tick is void
    Missed { count: usize },
}

/// Advance every unit by `speed * dt` and resolve it against the player.
///
/// The input slice is left untouched so that a miss leaves the live set as it
/// was before the tick.
pub fn resolve_units(units: &[Unit], player_lateral: f32, dt: f32, tuning: &Tuning) -> Resolution {
    let mut survivors = Vec::with_capacity(units.len());
    let mut caught = Vec::new();
    let mut missed = 0;

    for unit in units {
        let mut unit = unit.clone();
        unit.depth += unit.speed * dt;

        match classify(&unit, player_lateral, tuning) {
            UnitFate::Caught => caught.push(unit),
            UnitFate::Missed => missed += 1,
            UnitFate::InFlight => survivors.push(unit),
        }
    }

    if missed > 0 {
        Resolution::Missed { count: missed }
    } else {
        Resolution::Advanced { survivors, caught }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::UnitLabel;

    fn unit(id: u32, lateral: f32, depth: f32, speed: f32) -> Unit {
        Unit {
            id,
            lateral,
            depth,
            speed,
            label: UnitLabel::Required,
        }
    }

    #[test]
    fn test_unit_in_catch_box_is_caught() {
        let tuning = Tuning::default();
        let units = vec![unit(1, 0.5, 4.0, 10.0)];
        match resolve_units(&units, 0.0, 0.05, &tuning) {
            Resolution::Advanced { survivors, caught } => {
                assert!(survivors.is_empty());
                assert_eq!(caught.len(), 1);
                assert_eq!(caught[0].depth, 4.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_catch_box_is_strict() {
        let tuning = Tuning::default();
        let on_edge = unit(1, tuning.catch_radius, tuning.player_depth, 0.0);
        assert_eq!(classify(&on_edge, 0.0, &tuning), UnitFate::InFlight);
    }

    #[test]
    fn test_catch_wins_over_miss() {
        // Past the miss line but still inside a widened catch box
        let tuning = Tuning {
            catch_radius: 3.0,
            ..Default::default()
        };
        let u = unit(1, 0.0, tuning.player_depth + 2.0, 0.0);
        assert_eq!(classify(&u, 0.0, &tuning), UnitFate::Caught);
    }

    #[test]
    fn test_far_units_advance() {
        let tuning = Tuning::default();
        let units = vec![unit(1, 0.0, -30.0, 20.0), unit(2, 3.0, -10.0, 20.0)];
        match resolve_units(&units, 0.0, 0.1, &tuning) {
            Resolution::Advanced { survivors, caught } => {
                assert!(caught.is_empty());
                assert_eq!(survivors.len(), 2);
                assert_eq!(survivors[0].depth, -28.0);
                assert_eq!(survivors[1].depth, -8.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_any_miss_voids_the_tick() {
        let tuning = Tuning::default();
        let units = vec![
            unit(1, 0.0, 4.9, 0.0),
            unit(2, 5.0, 6.5, 0.0),
            unit(3, -5.0, 7.0, 0.0),
        ];
        assert_eq!(
            resolve_units(&units, 0.0, 0.016, &tuning),
            Resolution::Missed { count: 2 }
        );
    }

    #[test]
    fn test_unit_beside_player_passes_and_misses() {
        let tuning = Tuning::default();
        let units = vec![unit(1, 3.0, 5.5, 10.0)];
        // Beside the player and still within tolerance
        assert!(matches!(
            resolve_units(&units, 0.0, 0.0, &tuning),
            Resolution::Advanced { .. }
        ));
        // Next tick carries it past the tolerance
        assert_eq!(
            resolve_units(&units, 0.0, 0.1, &tuning),
            Resolution::Missed { count: 1 }
        );
    }
}
