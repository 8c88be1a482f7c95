//! Data-driven game balance
//!
//! Every number that shapes a run lives here so it can be overridden from
//! JSON without touching the simulation. Missing fields fall back to the
//! shipped defaults.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lane geometry ===
    /// Width of one lane (world units)
    pub lane_width: f32,
    /// Depth at which units appear (far end of the lane)
    pub spawn_depth: f32,
    /// Depth of the player's plane
    pub player_depth: f32,
    /// Pointer clamp, in lane widths either side of center
    pub pointer_limit_lanes: f32,

    // === Fall speed ===
    pub base_speed: f32,
    /// Speed added per point of score
    pub speed_growth: f32,

    // === Spawn cadence ===
    /// Seconds between spawns at score 0
    pub base_spawn_interval: f32,
    /// Floor for the spawn interval
    pub min_spawn_interval: f32,
    /// Interval divisor growth per point of score
    pub spawn_rate_factor: f32,

    // === Spawn spread (multiples of lane width) ===
    pub base_spread: f32,
    pub spread_growth: f32,
    pub max_spread: f32,

    // === Dual spawns ===
    /// Score that must be exceeded before two units can spawn at once
    pub dual_spawn_threshold: u64,
    /// Probability of a dual spawn above the threshold
    pub dual_spawn_chance: f32,
    /// Depth offset between the two units of a dual spawn
    pub dual_spawn_stagger: f32,

    // === Resolution ===
    /// Half-extent of the catch box around the player
    pub catch_radius: f32,
    /// Distance past the player plane that counts as a miss
    pub miss_tolerance: f32,

    // === Flavor thresholds ===
    /// Score above which every grade tier can be awarded
    pub grade_unlock_threshold: u64,
    /// Score above which the avatar panics
    pub panic_threshold: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_width: 2.5,
            spawn_depth: -30.0,
            player_depth: 5.0,
            pointer_limit_lanes: 2.5,

            base_speed: 18.0,
            speed_growth: 0.4,

            base_spawn_interval: 0.9,
            min_spawn_interval: 0.1,
            spawn_rate_factor: 0.08,

            base_spread: 2.0,
            spread_growth: 0.02,
            max_spread: 3.5,

            dual_spawn_threshold: 30,
            dual_spawn_chance: 0.3,
            dual_spawn_stagger: 2.0,

            catch_radius: 1.4,
            miss_tolerance: 1.0,

            grade_unlock_threshold: 80,
            panic_threshold: 50,
        }
    }
}

/// Why a tuning set was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A value that must be finite and strictly positive was not
    NotPositive { field: &'static str, value: f32 },
    /// A value that must be finite and non-negative was not
    Negative { field: &'static str, value: f32 },
    /// A probability outside [0, 1]
    Probability { field: &'static str, value: f32 },
    /// Units would spawn on or behind the player
    SpawnBehindPlayer { spawn_depth: f32, player_depth: f32 },
    /// The interval floor sits above the starting interval
    IntervalFloorAboveBase { min: f32, base: f32 },
    /// The spread cap sits below the starting spread
    SpreadCapBelowBase { max: f32, base: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NotPositive { field, value } => {
                write!(f, "{field} must be a positive number, got {value}")
            }
            TuningError::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            TuningError::Probability { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            TuningError::SpawnBehindPlayer {
                spawn_depth,
                player_depth,
            } => write!(
                f,
                "spawn_depth {spawn_depth} must be in front of player_depth {player_depth}"
            ),
            TuningError::IntervalFloorAboveBase { min, base } => write!(
                f,
                "min_spawn_interval {min} exceeds base_spawn_interval {base}"
            ),
            TuningError::SpreadCapBelowBase { max, base } => {
                write!(f, "max_spread {max} is below base_spread {base}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

impl Tuning {
    /// LocalStorage key for an optional balance override
    pub const STORAGE_KEY: &'static str = "tani_rush_tuning";

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate().context("tuning rejected")?;
        Ok(tuning)
    }

    /// Check the invariants the difficulty ramp relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("lane_width", self.lane_width)?;
        positive("pointer_limit_lanes", self.pointer_limit_lanes)?;
        non_negative("base_speed", self.base_speed)?;
        non_negative("speed_growth", self.speed_growth)?;
        positive("base_spawn_interval", self.base_spawn_interval)?;
        positive("min_spawn_interval", self.min_spawn_interval)?;
        non_negative("spawn_rate_factor", self.spawn_rate_factor)?;
        non_negative("base_spread", self.base_spread)?;
        non_negative("spread_growth", self.spread_growth)?;
        non_negative("max_spread", self.max_spread)?;
        non_negative("dual_spawn_stagger", self.dual_spawn_stagger)?;
        positive("catch_radius", self.catch_radius)?;
        non_negative("miss_tolerance", self.miss_tolerance)?;

        if !(0.0..=1.0).contains(&self.dual_spawn_chance) {
            return Err(TuningError::Probability {
                field: "dual_spawn_chance",
                value: self.dual_spawn_chance,
            });
        }
        if !(self.spawn_depth.is_finite() && self.spawn_depth < self.player_depth) {
            return Err(TuningError::SpawnBehindPlayer {
                spawn_depth: self.spawn_depth,
                player_depth: self.player_depth,
            });
        }
        if self.min_spawn_interval > self.base_spawn_interval {
            return Err(TuningError::IntervalFloorAboveBase {
                min: self.min_spawn_interval,
                base: self.base_spawn_interval,
            });
        }
        if self.max_spread < self.base_spread {
            return Err(TuningError::SpreadCapBelowBase {
                max: self.max_spread,
                base: self.base_spread,
            });
        }
        Ok(())
    }

    /// Largest lateral offset the pointer can drive the player to
    pub fn pointer_limit(&self) -> f32 {
        self.lane_width * self.pointer_limit_lanes
    }

    /// Load an override from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {e:#}"),
                }
            }
        }

        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
        assert!((Tuning::default().pointer_limit() - 6.25).abs() < 1e-6);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "catch_radius": 2.0, "dual_spawn_threshold": 5 }"#)
            .unwrap();
        assert_eq!(tuning.catch_radius, 2.0);
        assert_eq!(tuning.dual_spawn_threshold, 5);
        assert_eq!(tuning.base_speed, Tuning::default().base_speed);
    }

    #[test]
    fn test_rejects_bad_values() {
        let tuning = Tuning {
            catch_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { field: "catch_radius", .. })
        ));

        let tuning = Tuning {
            dual_spawn_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::Probability { .. })));

        let tuning = Tuning {
            spawn_depth: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpawnBehindPlayer { .. })
        ));

        let tuning = Tuning {
            min_spawn_interval: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::IntervalFloorAboveBase { .. })
        ));
    }

    #[test]
    fn test_from_json_reports_errors() {
        assert!(Tuning::from_json("not json").is_err());
        let err = Tuning::from_json(r#"{ "max_spread": 1.0 }"#).unwrap_err();
        assert!(format!("{err:#}").contains("max_spread"));
    }
}
