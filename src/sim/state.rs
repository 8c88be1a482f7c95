//! Game state and core simulation types

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Title screen, nothing has been played yet
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// A unit was missed; waiting for a retry
    Ended,
}

/// Cosmetic course label carried by a falling unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitLabel {
    Required,
    Elective,
    Lab,
    Language,
    PhysEd,
}

impl UnitLabel {
    pub const ALL: [UnitLabel; 5] = [
        UnitLabel::Required,
        UnitLabel::Elective,
        UnitLabel::Lab,
        UnitLabel::Language,
        UnitLabel::PhysEd,
    ];
}

/// Grade shown when a unit is caught, best tier first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    Excellent,
    Superior,
    Good,
    Passing,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Excellent, Grade::Superior, Grade::Good, Grade::Passing];
}

/// A falling credit unit
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: u32,
    /// Horizontal offset from the lane center
    pub lateral: f32,
    /// Position along the travel axis (grows toward the player)
    pub depth: f32,
    /// Fixed at spawn; units in flight never speed up
    pub speed: f32,
    pub label: UnitLabel,
}

impl Unit {
    /// World-space position (units hover at a fixed height)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.lateral, UNIT_HEIGHT, self.depth)
    }
}

/// Height units float at above the ground plane
pub const UNIT_HEIGHT: f32 = 0.8;
/// Height of a grade popup when it appears
pub const POPUP_HEIGHT: f32 = 2.0;

/// Things the presentation layer reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    UnitSpawned {
        id: u32,
        label: UnitLabel,
        position: Vec3,
    },
    UnitCaught {
        id: u32,
        grade: Grade,
        position: Vec3,
    },
    ScoreChanged(u64),
    /// Emitted exactly once per session
    SessionEnded {
        score: u64,
        best_score: u64,
        new_best: bool,
        excuse: &'static str,
    },
}

/// Hands out entity IDs; 0 is never issued
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the rng was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    /// Live units, in spawn order
    pub units: Vec<Unit>,
    /// Player's clamped lateral position as of the last tick
    pub player_lateral: f32,
    /// Excuse picked when the last session ended
    pub excuse: Option<&'static str>,
    pub ids: IdAllocator,
}

impl GameState {
    /// Create a fresh, not-yet-started state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            score: 0,
            best_score: 0,
            units: Vec::new(),
            player_lateral: 0.0,
            excuse: None,
            ids: IdAllocator::default(),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Clear everything scoped to a single session
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.units.clear();
        self.player_lateral = 0.0;
        self.excuse = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert!(a > 0 && b > 0);
    }

    #[test]
    fn test_reset_keeps_best_score() {
        let mut state = GameState::new(1);
        state.score = 12;
        state.best_score = 40;
        state.units.push(Unit {
            id: 1,
            lateral: 0.0,
            depth: 0.0,
            speed: 1.0,
            label: UnitLabel::Lab,
        });
        state.reset_session();
        assert_eq!(state.score, 0);
        assert!(state.units.is_empty());
        assert_eq!(state.best_score, 40);
    }
}
