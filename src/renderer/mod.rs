//! WebGPU rendering module
//!
//! The scene is projected on the CPU with `glam` and drawn as a single
//! alpha-blended triangle list.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
pub use scene::{SceneInput, build_scene};
pub use vertex::Vertex;
