//! Demo player
//!
//! Steers toward whichever unit will reach the player plane first.

use std::collections::BTreeMap;

use super::session::{Session, TickInput};
use super::state::{GameEvent, GamePhase, GameState, Grade};
use crate::consts::SIM_DT;
use crate::persistence::BestScoreStore;
use crate::tuning::Tuning;

/// Outcome of a headless autopilot run
#[derive(Debug, Clone, Default)]
pub struct AutopilotRun {
    /// Simulated seconds
    pub elapsed: f32,
    /// Catches per grade
    pub grades: BTreeMap<Grade, u32>,
    /// Set when a unit slipped past and the session ended on its own
    pub ended_by_miss: bool,
}

/// Lateral position the autopilot wants this tick, if anything is in flight
pub fn autopilot_target(state: &GameState, tuning: &Tuning) -> Option<f32> {
    state
        .units
        .iter()
        .filter(|u| u.depth <= tuning.player_depth + tuning.miss_tolerance)
        .min_by(|a, b| {
            let ta = time_to_plane(a.depth, a.speed, tuning.player_depth);
            let tb = time_to_plane(b.depth, b.speed, tuning.player_depth);
            ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|u| u.lateral)
}

/// Play a started session at the fixed timestep for up to `max_seconds`.
///
/// Running out of time leaves the session `Playing`; only a miss ends it.
pub fn run_autopilot<S: BestScoreStore>(
    session: &mut Session<S>,
    max_seconds: f32,
) -> AutopilotRun {
    let mut run = AutopilotRun::default();
    let mut input = TickInput::default();

    while run.elapsed < max_seconds && session.phase() == GamePhase::Playing {
        if let Some(target) = autopilot_target(session.state(), session.tuning()) {
            input.pointer_lateral = target;
        }
        for event in session.update(SIM_DT, &input) {
            match event {
                GameEvent::UnitCaught { grade, .. } => *run.grades.entry(grade).or_insert(0) += 1,
                GameEvent::SessionEnded { .. } => run.ended_by_miss = true,
                _ => {}
            }
        }
        run.elapsed += SIM_DT;
    }

    run
}

fn time_to_plane(depth: f32, speed: f32, plane: f32) -> f32 {
    let remaining = (plane - depth).max(0.0);
    if speed > 0.0 {
        remaining / speed
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Unit, UnitLabel};

    fn unit(id: u32, lateral: f32, depth: f32, speed: f32) -> Unit {
        Unit {
            id,
            lateral,
            depth,
            speed,
            label: UnitLabel::Elective,
        }
    }

    #[test]
    fn test_empty_lane_has_no_target() {
        let state = GameState::new(1);
        assert_eq!(autopilot_target(&state, &Tuning::default()), None);
    }

    #[test]
    fn test_targets_soonest_arrival() {
        let mut state = GameState::new(1);
        // Closer but slow vs farther but fast
        state.units.push(unit(1, -2.0, 0.0, 1.0));
        state.units.push(unit(2, 2.0, -10.0, 100.0));
        assert_eq!(autopilot_target(&state, &Tuning::default()), Some(2.0));
    }

    #[test]
    fn test_autopilot_survives_early_game() {
        let mut session = Session::new(2024, Tuning::default(), MemoryStore::default());
        session.start();

        // 20 seconds at the fixed timestep
        for _ in 0..(20 * 120) {
            let input = TickInput {
                pointer_lateral: autopilot_target(session.state(), session.tuning())
                    .unwrap_or(0.0),
            };
            session.update(SIM_DT, &input);
        }

        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.score() > 10, "score = {}", session.score());
    }

    #[test]
    fn test_run_out_of_time_keeps_session_open() {
        let mut session = Session::new(2024, Tuning::default(), MemoryStore::default());
        session.start();

        let run = run_autopilot(&mut session, 5.0);

        assert!(!run.ended_by_miss);
        assert!(run.elapsed >= 5.0);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.excuse(), None);
        assert_eq!(session.store().writes(), 0);
        assert_eq!(run.grades.values().sum::<u32>() as u64, session.score());
    }

    #[test]
    fn test_run_ends_only_through_a_miss() {
        // Player pinned near the centre while units spread across ±2.5
        let tuning = Tuning {
            pointer_limit_lanes: 0.01,
            ..Tuning::default()
        };
        let mut session = Session::new(7, tuning, MemoryStore::default());
        session.start();

        let run = run_autopilot(&mut session, 120.0);

        assert!(run.ended_by_miss);
        assert!(run.elapsed < 120.0);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert!(session.excuse().is_some());
    }
}
