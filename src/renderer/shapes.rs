//! Shape generation for screen-space primitives
//!
//! Everything here works in NDC. `aspect` (width / height) keeps circles round
//! on non-square surfaces.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Filled ellipse that appears as a circle of `radius` (vertical NDC units)
pub fn circle(center: Vec2, radius: f32, aspect: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rx = radius / aspect;

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + rx * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + rx * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Axis-aligned rectangle rotated by `angle` around its center
pub fn rect(center: Vec2, half: Vec2, angle: f32, aspect: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (s, c) = angle.sin_cos();
    let corner = |x: f32, y: f32| {
        let rx = x * c - y * s;
        let ry = x * s + y * c;
        Vec2::new(center.x + rx / aspect, center.y + ry)
    };
    let a = corner(-half.x, -half.y);
    let b = corner(half.x, -half.y);
    let cc = corner(half.x, half.y);
    let d = corner(-half.x, half.y);

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(cc.x, cc.y, color),
        Vertex::new(cc.x, cc.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Line between two NDC points with a width in vertical NDC units
pub fn line(p1: Vec2, p2: Vec2, width: f32, aspect: f32, color: [f32; 4]) -> Vec<Vertex> {
    // Work in aspect-corrected space so the width is uniform
    let a = Vec2::new(p1.x * aspect, p1.y);
    let b = Vec2::new(p2.x * aspect, p2.y);
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let to_ndc = |v: Vec2| Vec2::new(v.x / aspect, v.y);

    let v1a = to_ndc(a + perp);
    let v1b = to_ndc(a - perp);
    let v2a = to_ndc(b + perp);
    let v2b = to_ndc(b - perp);

    vec![
        Vertex::new(v1a.x, v1a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2b.x, v2b.y, color),
    ]
}

/// Faceted hexagon for units, rotated by `spin`
pub fn gem(center: Vec2, radius: f32, spin: f32, aspect: f32, color: [f32; 4]) -> Vec<Vertex> {
    const SIDES: u32 = 6;
    let light = shade(color, 1.25);
    let dark = shade(color, 0.7);
    let mut vertices = Vec::with_capacity((SIDES * 3) as usize);
    let rx = radius / aspect;

    for i in 0..SIDES {
        let t1 = spin + (i as f32 / SIDES as f32) * 2.0 * PI;
        let t2 = spin + ((i + 1) as f32 / SIDES as f32) * 2.0 * PI;
        // Alternate facets for a faceted look
        let facet = if i % 2 == 0 { light } else { dark };
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(center.x + rx * t1.cos(), center.y + radius * t1.sin(), facet));
        vertices.push(Vertex::new(center.x + rx * t2.cos(), center.y + radius * t2.sin(), facet));
    }

    vertices
}

/// Scale RGB by `factor`, keeping alpha
pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [
        (color[0] * factor).min(1.0),
        (color[1] * factor).min(1.0),
        (color[2] * factor).min(1.0),
        color[3],
    ]
}

/// Blend `color` toward `fog` by `amount` (0 = none, 1 = fully fogged)
pub fn fog(color: [f32; 4], fog: [f32; 4], amount: f32) -> [f32; 4] {
    let t = amount.clamp(0.0, 1.0);
    [
        color[0] + (fog[0] - color[0]) * t,
        color[1] + (fog[1] - color[1]) * t,
        color[2] + (fog[2] - color[2]) * t,
        color[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let white = [1.0; 4];
        assert_eq!(circle(Vec2::ZERO, 0.1, 1.0, white, 12).len(), 36);
        assert_eq!(circle(Vec2::ZERO, 0.1, 1.0, white, 1).len(), 9);
        assert_eq!(rect(Vec2::ZERO, Vec2::splat(0.1), 0.0, 1.0, white).len(), 6);
        assert_eq!(gem(Vec2::ZERO, 0.1, 0.0, 1.0, white).len(), 18);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 0.01, 1.0, [1.0; 4]).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::ONE, 0.01, 1.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_circle_respects_aspect() {
        let verts = circle(Vec2::ZERO, 0.5, 2.0, [1.0; 4], 4);
        let max_x = verts.iter().map(|v| v.position[0]).fold(0.0f32, f32::max);
        let max_y = verts.iter().map(|v| v.position[1]).fold(0.0f32, f32::max);
        assert!((max_x - 0.25).abs() < 1e-5);
        assert!((max_y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_fog_blend() {
        let c = fog([1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0], 0.5);
        assert_eq!(c, [0.5, 0.0, 0.5, 1.0]);
        assert_eq!(fog([1.0; 4], [0.0; 4], 2.0)[0], 0.0);
    }
}
