//! Vertex types for screen-space rendering

use bytemuck::{Pod, Zeroable};

/// NDC position with a straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// Background and fog (#1a3c34)
    pub const BACKGROUND: [f32; 4] = [0.102, 0.235, 0.204, 1.0];
    pub const GRID_CELL: [f32; 4] = [1.0, 1.0, 1.0, 0.25];
    pub const GRID_SECTION: [f32; 4] = [0.369, 0.918, 0.831, 0.6];
    /// Player body (#38bdf8)
    pub const PLAYER_BODY: [f32; 4] = [0.220, 0.741, 0.973, 1.0];
    /// Player head (#fca5a5)
    pub const PLAYER_HEAD: [f32; 4] = [0.988, 0.647, 0.647, 1.0];
    pub const GLASSES: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const SWEAT: [f32; 4] = [0.0, 1.0, 1.0, 0.9];
    /// Unit base color (#fbbf24)
    pub const UNIT: [f32; 4] = [0.984, 0.749, 0.141, 1.0];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
    pub const DEBRIS: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
}
