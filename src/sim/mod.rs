//! Gameplay core
//!
//! Difficulty, spawning, collision and the session state machine. Given the
//! same seed, tuning and per-frame inputs a session replays identically;
//! nothing here touches the DOM or the GPU.

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod session;
pub mod spawner;
pub mod state;

pub use autopilot::{AutopilotRun, autopilot_target, run_autopilot};
pub use collision::{Resolution, UnitFate, classify, resolve_units};
pub use difficulty::{DifficultyParams, parameters_for};
pub use session::{Session, TickInput, pick_grade};
pub use spawner::Spawner;
pub use state::{
    GameEvent, GamePhase, GameState, Grade, IdAllocator, POPUP_HEIGHT, UNIT_HEIGHT, Unit,
    UnitLabel,
};
