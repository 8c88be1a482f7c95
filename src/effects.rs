//! Presentation-side animation state
//!
//! Grade popups, camera shake, the avatar's easing/bob and the floating
//! background debris. Driven by [`GameEvent`]s and the frame delta; nothing
//! here feeds back into the simulation.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_POPUPS;
use crate::lerp;
use crate::settings::Settings;
use crate::sim::{GameEvent, Grade};

/// Rise speed of a popup (units/s)
const POPUP_RISE: f32 = 3.0;
/// Growth of a popup (scale/s)
const POPUP_GROWTH: f32 = 1.0;
/// Fade of a popup (opacity/s)
const POPUP_FADE: f32 = 1.5;

/// Shake added per point of score, and its cap
const SHAKE_PER_POINT: f32 = 0.005;
const MAX_SHAKE: f32 = 0.3;

/// Avatar follow stiffness
const AVATAR_FOLLOW: f32 = 25.0;
const AVATAR_BOB_RATE: f32 = 20.0;
const AVATAR_BOB_HEIGHT: f32 = 0.3;
const PANIC_JITTER: f32 = 0.1;

/// A floating grade that rises and fades after a catch
#[derive(Debug, Clone, PartialEq)]
pub struct GradePopup {
    pub id: u32,
    pub grade: Grade,
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

/// Eased avatar pose
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Avatar {
    pub x: f32,
    pub y: f32,
    /// Roll from lagging behind the pointer
    pub roll: f32,
    pub yaw: f32,
}

/// A background speck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debris {
    pub position: Vec3,
    pub size: f32,
    pub float_speed: f32,
    pub phase: f32,
}

impl Debris {
    /// Position with its gentle float applied
    pub fn animated_position(&self, time: f32) -> Vec3 {
        let t = time * self.float_speed + self.phase;
        self.position + Vec3::new(0.0, t.sin() * 0.5, 0.0)
    }
}

/// Per-frame inputs to the effects update
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub playing: bool,
    pub score: u64,
    /// Where the player really is (clamped pointer)
    pub target_lateral: f32,
    pub panic_threshold: u64,
}

pub struct Effects {
    popups: Vec<GradePopup>,
    shake: f32,
    camera_offset: Vec2,
    avatar: Avatar,
    debris: Vec<Debris>,
    panic: bool,
    elapsed: f32,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64, debris_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let debris = (0..debris_count)
            .map(|_| Debris {
                position: Vec3::new(
                    (rng.random::<f32>() - 0.5) * 40.0,
                    (rng.random::<f32>() - 0.5) * 30.0 + 10.0,
                    (rng.random::<f32>() - 0.5) * 60.0 - 20.0,
                ),
                size: rng.random::<f32>() * 1.5 + 0.5,
                float_speed: rng.random::<f32>() * 2.0 + 1.0,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
            })
            .collect();

        Self {
            popups: Vec::with_capacity(MAX_POPUPS),
            shake: 0.0,
            camera_offset: Vec2::ZERO,
            avatar: Avatar::default(),
            debris,
            panic: false,
            elapsed: 0.0,
            rng,
        }
    }

    /// Clear session-scoped effects (on start/restart)
    pub fn reset(&mut self) {
        self.popups.clear();
        self.shake = 0.0;
        self.panic = false;
    }

    pub fn handle_event(&mut self, event: &GameEvent, settings: &Settings) {
        if let GameEvent::UnitCaught { id, grade, position } = event {
            if !settings.grade_popups {
                return;
            }
            self.popups.push(GradePopup {
                id: *id,
                grade: *grade,
                position: *position,
                scale: 1.0,
                opacity: 1.0,
            });
            if self.popups.len() > MAX_POPUPS {
                let excess = self.popups.len() - MAX_POPUPS;
                self.popups.drain(..excess);
            }
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &FrameContext, settings: &Settings) {
        self.elapsed += dt;

        if ctx.playing {
            let target = if settings.effective_screen_shake() {
                (ctx.score as f32 * SHAKE_PER_POINT).min(MAX_SHAKE)
            } else {
                0.0
            };
            self.shake = lerp(self.shake, target, dt.min(1.0));
            self.camera_offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * self.shake,
                (self.rng.random::<f32>() - 0.5) * self.shake,
            );
            self.panic = ctx.score > ctx.panic_threshold;
        } else {
            // Settle back to rest
            let t = (dt * 2.0).min(1.0);
            self.camera_offset = self.camera_offset.lerp(Vec2::ZERO, t);
        }

        let follow = (dt * AVATAR_FOLLOW).min(1.0);
        self.avatar.x = lerp(self.avatar.x, ctx.target_lateral, follow);
        let lag = self.avatar.x - ctx.target_lateral;
        self.avatar.roll = lag * 0.3;
        self.avatar.yaw = lag * 0.15;
        if self.panic && settings.effective_jitter() {
            self.avatar.x += (self.rng.random::<f32>() - 0.5) * PANIC_JITTER;
        }
        self.avatar.y = (self.elapsed * AVATAR_BOB_RATE).sin().abs() * AVATAR_BOB_HEIGHT;

        for popup in &mut self.popups {
            popup.position.y += dt * POPUP_RISE;
            popup.scale += dt * POPUP_GROWTH;
            popup.opacity -= dt * POPUP_FADE;
        }
        self.popups.retain(|p| p.opacity > 0.0);
    }

    pub fn popups(&self) -> &[GradePopup] {
        &self.popups
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn shake(&self) -> f32 {
        self.shake
    }

    pub fn avatar(&self) -> Avatar {
        self.avatar
    }

    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    pub fn panic(&self) -> bool {
        self.panic
    }

    /// Seconds of animation time elapsed
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
