//! Scene assembly
//!
//! Projects the lane, the avatar, the units and the effects through the camera
//! and emits one triangle list, farthest first so alpha blending layers
//! correctly without a depth buffer.

use glam::{Vec2, Vec3};

use super::camera::Camera;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::effects::{Effects, GradePopup};
use crate::settings::Settings;
use crate::sim::{Grade, Unit, UnitLabel};

/// Fog ramp (view distance)
const FOG_NEAR: f32 = 20.0;
const FOG_FAR: f32 = 70.0;

/// Ground grid extents
const GRID_HALF_WIDTH: f32 = 30.0;
const GRID_NEAR: f32 = 10.0;
const GRID_FAR: f32 = -70.0;
const GRID_CELL: f32 = 2.0;
/// Every Nth grid line is a section line
const GRID_SECTION_EVERY: i32 = 5;

const UNIT_RADIUS: f32 = 0.6;

/// Everything the scene needs for one frame
pub struct SceneInput<'a> {
    pub units: &'a [Unit],
    pub effects: &'a Effects,
    pub settings: &'a Settings,
    pub player_depth: f32,
}

enum Drawable<'a> {
    Debris(Vec3, f32),
    Unit(&'a Unit),
    Player,
    Popup(&'a GradePopup),
}

fn fog_amount(distance: f32) -> f32 {
    ((distance - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0)
}

fn label_tint(label: UnitLabel) -> f32 {
    match label {
        UnitLabel::Required => 1.0,
        UnitLabel::Elective => 0.92,
        UnitLabel::Lab => 1.08,
        UnitLabel::Language => 0.85,
        UnitLabel::PhysEd => 1.15,
    }
}

fn grade_color(grade: Grade) -> [f32; 4] {
    match grade {
        Grade::Excellent => colors::UNIT,
        Grade::Superior => colors::PLAYER_BODY,
        Grade::Good | Grade::Passing => [1.0, 1.0, 1.0, 1.0],
    }
}

/// Build this frame's vertices
pub fn build_scene(input: &SceneInput<'_>, camera: &Camera) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);
    let aspect = camera.aspect;
    let segments = input.settings.quality.circle_segments();
    let time = input.effects.elapsed();

    grid(&mut vertices, camera);

    // Depth-sort everything else, farthest first
    let mut drawables: Vec<(f32, Drawable<'_>)> = Vec::new();
    let debris_count = input.settings.debris_count();
    for d in input.effects.debris().iter().take(debris_count) {
        let pos = d.animated_position(time);
        if let Some(p) = camera.project(pos) {
            drawables.push((p.distance, Drawable::Debris(pos, d.size)));
        }
    }
    for unit in input.units {
        if let Some(p) = camera.project(unit.position()) {
            drawables.push((p.distance, Drawable::Unit(unit)));
        }
    }
    let avatar = input.effects.avatar();
    let player_world = Vec3::new(avatar.x, avatar.y, input.player_depth);
    if let Some(p) = camera.project(player_world) {
        drawables.push((p.distance, Drawable::Player));
    }
    for popup in input.effects.popups() {
        if let Some(p) = camera.project(popup.position) {
            drawables.push((p.distance, Drawable::Popup(popup)));
        }
    }
    drawables.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    for (_, drawable) in &drawables {
        match drawable {
            Drawable::Debris(pos, size) => {
                if let Some(p) = camera.project(*pos) {
                    let color = colors::DEBRIS;
                    vertices.extend(shapes::circle(p.ndc, size * 0.15 * p.scale, aspect, color, 6));
                }
            }
            Drawable::Unit(unit) => unit_shape(&mut vertices, unit, camera, time, segments),
            Drawable::Player => player_shape(&mut vertices, player_world, input, camera, segments),
            Drawable::Popup(popup) => {
                if let Some(p) = camera.project(popup.position) {
                    let mut color = grade_color(popup.grade);
                    color[3] = popup.opacity.clamp(0.0, 1.0) * 0.35;
                    let radius = 0.5 * popup.scale * p.scale;
                    vertices.extend(shapes::circle(p.ndc, radius, aspect, color, segments));
                }
            }
        }
    }

    vertices
}

fn grid(vertices: &mut Vec<Vertex>, camera: &Camera) {
    let aspect = camera.aspect;
    let project = |p: Vec3| camera.project(p);

    // Lines running down the lane
    let columns = (GRID_HALF_WIDTH / GRID_CELL) as i32;
    for i in -columns..=columns {
        let x = i as f32 * GRID_CELL;
        let (Some(a), Some(b)) = (
            project(Vec3::new(x, 0.0, GRID_FAR)),
            project(Vec3::new(x, 0.0, GRID_NEAR)),
        ) else {
            continue;
        };
        let base = if i % GRID_SECTION_EVERY == 0 {
            colors::GRID_SECTION
        } else {
            colors::GRID_CELL
        };
        let color = shapes::fog(base, colors::BACKGROUND, fog_amount((a.distance + b.distance) / 2.0));
        vertices.extend(shapes::line(a.ndc, b.ndc, 0.002, aspect, color));
    }

    // Cross lines
    let rows = ((GRID_NEAR - GRID_FAR) / GRID_CELL) as i32;
    for j in 0..=rows {
        let z = GRID_FAR + j as f32 * GRID_CELL;
        let (Some(a), Some(b)) = (
            project(Vec3::new(-GRID_HALF_WIDTH, 0.0, z)),
            project(Vec3::new(GRID_HALF_WIDTH, 0.0, z)),
        ) else {
            continue;
        };
        let base = if j % GRID_SECTION_EVERY == 0 {
            colors::GRID_SECTION
        } else {
            colors::GRID_CELL
        };
        let color = shapes::fog(base, colors::BACKGROUND, fog_amount(a.distance.min(b.distance)));
        vertices.extend(shapes::line(a.ndc, b.ndc, 0.002, aspect, color));
    }
}

fn unit_shape(vertices: &mut Vec<Vertex>, unit: &Unit, camera: &Camera, time: f32, segments: u32) {
    let aspect = camera.aspect;
    let world = unit.position();

    // Ground shadow
    if let Some(shadow) = camera.project(Vec3::new(world.x, 0.0, world.z)) {
        let r = UNIT_RADIUS * 0.8 * shadow.scale;
        vertices.extend(shapes::circle(shadow.ndc, r, aspect, colors::SHADOW, segments));
    }

    // Quick bob and spin
    let phase = unit.id as f32 * 1.7;
    let bob = (time * 15.0 + phase).sin() * 0.15;
    let Some(p) = camera.project(world + Vec3::new(0.0, bob, 0.0)) else {
        return;
    };
    let base = shapes::shade(colors::UNIT, label_tint(unit.label));
    let color = shapes::fog(base, colors::BACKGROUND, fog_amount(p.distance));
    let spin = time * 5.0 + phase;
    vertices.extend(shapes::gem(p.ndc, UNIT_RADIUS * p.scale, spin, aspect, color));
}

fn player_shape(
    vertices: &mut Vec<Vertex>,
    base: Vec3,
    input: &SceneInput<'_>,
    camera: &Camera,
    segments: u32,
) {
    let aspect = camera.aspect;
    let avatar = input.effects.avatar();
    let at = |offset: Vec3| camera.project(base + offset);

    if let Some(shadow) = camera.project(Vec3::new(base.x, 0.0, base.z)) {
        vertices.extend(shapes::circle(shadow.ndc, 0.5 * shadow.scale, aspect, colors::SHADOW, segments));
    }

    // Capsule body: two caps joined by a box
    for cap_y in [0.35, 1.15] {
        if let Some(p) = at(Vec3::new(0.0, cap_y, 0.0)) {
            vertices.extend(shapes::circle(p.ndc, 0.4 * p.scale, aspect, colors::PLAYER_BODY, segments));
        }
    }
    if let Some(p) = at(Vec3::new(0.0, 0.75, 0.0)) {
        let half = Vec2::new(0.4, 0.4) * p.scale;
        vertices.extend(shapes::rect(p.ndc, half, avatar.roll, aspect, colors::PLAYER_BODY));
    }

    // Head and glasses
    if let Some(p) = at(Vec3::new(0.0, 1.4, 0.0)) {
        vertices.extend(shapes::circle(p.ndc, 0.35 * p.scale, aspect, colors::PLAYER_HEAD, segments));
    }
    if let Some(p) = at(Vec3::new(0.0, 1.45, 0.3)) {
        let half = Vec2::new(0.2, 0.05) * p.scale;
        vertices.extend(shapes::rect(p.ndc, half, avatar.roll, aspect, colors::GLASSES));
    }

    if input.effects.panic() {
        if let Some(p) = at(Vec3::new(0.6, 1.8, 0.0)) {
            vertices.extend(shapes::circle(p.ndc, 0.15 * p.scale, aspect, colors::SWEAT, segments));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, depth: f32) -> Unit {
        Unit {
            id,
            lateral: 0.0,
            depth,
            speed: 18.0,
            label: UnitLabel::Required,
        }
    }

    fn build(units: &[Unit], effects: &Effects, settings: &Settings) -> Vec<Vertex> {
        let input = SceneInput {
            units,
            effects,
            settings,
            player_depth: 5.0,
        };
        build_scene(&input, &Camera::new(16.0 / 9.0))
    }

    #[test]
    fn test_units_add_geometry() {
        let settings = Settings::default();
        let effects = Effects::new(1, 0);
        let empty = build(&[], &effects, &settings).len();
        assert!(empty > 0, "grid and player are always drawn");

        let one = build(&[unit(1, -10.0)], &effects, &settings).len();
        let two = build(&[unit(1, -10.0), unit(2, -20.0)], &effects, &settings).len();
        assert!(one > empty);
        assert_eq!(two - one, one - empty);
    }

    #[test]
    fn test_debris_follows_settings() {
        let effects = Effects::new(1, 50);
        let on = build(&[], &effects, &Settings::default()).len();
        let off = build(
            &[],
            &effects,
            &Settings {
                debris: false,
                ..Default::default()
            },
        )
        .len();
        assert!(on > off);
    }

    #[test]
    fn test_vertices_are_finite() {
        let settings = Settings::default();
        let effects = Effects::new(3, 50);
        let verts = build(&[unit(1, -30.0), unit(2, 5.5)], &effects, &settings);
        assert!(verts.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_fog_amount_ramp() {
        assert_eq!(fog_amount(0.0), 0.0);
        assert_eq!(fog_amount(FOG_FAR + 10.0), 1.0);
        assert!((fog_amount(45.0) - 0.5).abs() < 1e-6);
    }
}
