//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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
    pub const CAT_BODY: [f32; 4] = [0.85, 0.45, 0.16, 1.0];
    pub const CAT_DARK: [f32; 4] = [0.65, 0.32, 0.10, 1.0];
    pub const CAT_DEAD: [f32; 4] = [0.55, 0.20, 0.18, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
    pub const GRASS: [f32; 4] = [0.16, 0.47, 0.12, 1.0];
    pub const GRASS_LIGHT: [f32; 4] = [0.25, 0.59, 0.18, 1.0];
    pub const GRASS_DARK: [f32; 4] = [0.10, 0.31, 0.08, 1.0];
    pub const DIRT: [f32; 4] = [0.40, 0.26, 0.13, 1.0];
    pub const HUD_TEXT: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const HUD_ACCENT: [f32; 4] = [0.39, 0.20, 0.59, 1.0];
    pub const COMBO_TEXT: [f32; 4] = [0.78, 0.20, 0.20, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const GAME_OVER_TEXT: [f32; 4] = [1.0, 0.20, 0.20, 1.0];
    pub const NEW_RECORD_TEXT: [f32; 4] = [1.0, 0.86, 0.0, 1.0];
    pub const TITLE_TEXT: [f32; 4] = [0.27, 0.12, 0.08, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
