//! Perspective camera looking down the lane

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Camera rest position
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 10.0, 14.0);
/// Downward pitch (radians)
pub const CAMERA_PITCH: f32 = -0.5;
/// Vertical field of view (degrees)
pub const CAMERA_FOV_DEG: f32 = 55.0;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 200.0;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: CAMERA_EYE,
            pitch: CAMERA_PITCH,
            fov_y: CAMERA_FOV_DEG.to_radians(),
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
        }
    }

    /// Camera displaced by the current shake offset
    pub fn shaken(&self, offset: Vec2) -> Self {
        Self {
            eye: self.eye + Vec3::new(offset.x, offset.y, 0.0),
            ..*self
        }
    }

    pub fn view(&self) -> Mat4 {
        (Mat4::from_translation(self.eye) * Mat4::from_rotation_x(self.pitch)).inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Project a world point to NDC. Also returns the perspective scale
    /// (NDC units per world unit at that depth) and the view distance.
    /// `None` when the point is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= Z_NEAR {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let focal = 1.0 / (self.fov_y / 2.0).tan();
        Some(Projected {
            ndc,
            scale: focal / clip.w,
            distance: clip.w,
        })
    }

    /// Width of the visible area (world units) at the focus distance, the
    /// distance from the eye to the lane origin
    pub fn viewport_width(&self) -> f32 {
        let distance = self.eye.length();
        let height = 2.0 * (self.fov_y / 2.0).tan() * distance;
        height * self.aspect
    }

    /// Map a pointer's horizontal NDC (-1..1) to a lateral world position
    pub fn pointer_to_lateral(&self, ndc_x: f32) -> f32 {
        ndc_x * self.viewport_width() * 0.5
    }
}

/// Result of projecting a world point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub ndc: Vec2,
    /// Vertical NDC units per world unit; divide by aspect for horizontal
    pub scale: f32,
    /// Distance along the view axis
    pub distance: f32,
}
