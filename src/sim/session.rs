//! Session controller
//!
//! Owns the game state and drives one tick at a time:
//! difficulty -> spawner -> motion/collision -> score and phase.
//! NotStarted -> Playing -> Ended -> Playing -> ... (no way back to NotStarted)

use rand::Rng;

use super::collision::{Resolution, resolve_units};
use super::difficulty::parameters_for;
use super::spawner::Spawner;
use super::state::{GameEvent, GamePhase, GameState, Grade, POPUP_HEIGHT, Unit};
use crate::flavor;
use crate::persistence::BestScoreStore;
use crate::platform::sanitize_dt;
use crate::tuning::Tuning;

/// Input sampled from the host for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Desired lateral player position in world units (clamped by the session)
    pub pointer_lateral: f32,
}

/// Pick the grade shown for a catch at `score`.
///
/// Only the top two tiers are awarded until the score passes the unlock
/// threshold; after that all four come up evenly.
pub fn pick_grade<R: Rng>(score: u64, tuning: &Tuning, rng: &mut R) -> Grade {
    let tiers = if score > tuning.grade_unlock_threshold {
        Grade::ALL.len()
    } else {
        2
    };
    Grade::ALL[rng.random_range(0..tiers)]
}

/// One game session plus the best score across sessions
pub struct Session<S: BestScoreStore> {
    state: GameState,
    tuning: Tuning,
    spawner: Spawner,
    store: S,
}

impl<S: BestScoreStore> Session<S> {
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let mut state = GameState::new(seed);
        state.best_score = store.read_best_score();
        Self {
            state,
            tuning,
            spawner: Spawner::default(),
            store,
        }
    }

    /// Begin (or restart) a session
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::Playing {
            log::debug!("Restarting a session that was still running");
        }
        self.state.reset_session();
        self.spawner.reset();
        self.state.phase = GamePhase::Playing;
        log::info!("Session started (best: {})", self.state.best_score);
    }

    /// Advance the session by `dt` seconds
    pub fn update(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state.phase != GamePhase::Playing {
            return events;
        }

        let dt = sanitize_dt(dt);
        let limit = self.tuning.pointer_limit();
        let player = if input.pointer_lateral.is_finite() {
            input.pointer_lateral.clamp(-limit, limit)
        } else {
            self.state.player_lateral
        };
        self.state.player_lateral = player;

        let score = self.state.score;
        let params = parameters_for(score, &self.tuning);

        let state = &mut self.state;
        let spawned = {
            let GameState { rng, ids, .. } = &mut *state;
            self.spawner
                .advance(dt, &params, &self.tuning, rng, || ids.next_id())
        };

        let mut candidates = Vec::with_capacity(state.units.len() + spawned.len());
        candidates.extend_from_slice(&state.units);
        candidates.extend(spawned.iter().cloned());

        match resolve_units(&candidates, player, dt, &self.tuning) {
            Resolution::Missed { count } => {
                log::debug!("{count} unit(s) slipped past at score {score}");
                if let Some(event) = self.end() {
                    events.push(event);
                }
            }
            Resolution::Advanced { survivors, caught } => {
                for unit in &spawned {
                    events.push(GameEvent::UnitSpawned {
                        id: unit.id,
                        label: unit.label,
                        position: unit.position(),
                    });
                }
                for unit in &caught {
                    let grade = pick_grade(score, &self.tuning, &mut state.rng);
                    let mut position = unit.position();
                    position.y = POPUP_HEIGHT;
                    events.push(GameEvent::UnitCaught {
                        id: unit.id,
                        grade,
                        position,
                    });
                }
                state.units = survivors;
                if !caught.is_empty() {
                    state.score = state.score.saturating_add(caught.len() as u64);
                    events.push(GameEvent::ScoreChanged(state.score));
                }
            }
        }

        events
    }

    /// Terminal signal. Only the first call of a session has any effect.
    pub fn end(&mut self) -> Option<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return None;
        }
        self.state.phase = GamePhase::Ended;

        let excuse = flavor::pick_excuse(&mut self.state.rng);
        self.state.excuse = Some(excuse);

        let score = self.state.score;
        let new_best = score > self.state.best_score;
        if new_best {
            self.state.best_score = score;
            self.store.write_best_score(score);
            log::info!("New best score: {score}");
        }
        log::info!("Session ended at {score}: {excuse}");

        Some(GameEvent::SessionEnded {
            score,
            best_score: self.state.best_score,
            new_best,
            excuse,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn best_score(&self) -> u64 {
        self.state.best_score
    }

    pub fn units(&self) -> &[Unit] {
        &self.state.units
    }

    pub fn player_lateral(&self) -> f32 {
        self.state.player_lateral
    }

    pub fn excuse(&self) -> Option<&'static str> {
        self.state.excuse
    }

    pub fn rank_title(&self) -> &'static str {
        flavor::rank_title(self.state.score)
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawner.timer
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
