//! Tani Rush - a single-lane catch-the-credits arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, spawning, collisions, session)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame timing shared by the browser and native loops
//! - `persistence`: Best-score storage
//! - `tuning`: Data-driven game balance

pub mod effects;
pub mod flavor;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::{BestScoreStore, MemoryStore};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host loop (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Grade popups kept alive at once
    pub const MAX_POPUPS: usize = 10;
    /// Background specks floating behind the lane
    pub const DEBRIS_COUNT: usize = 50;
}

/// Linear interpolation from `current` toward `target`
#[inline]
pub fn lerp(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}
