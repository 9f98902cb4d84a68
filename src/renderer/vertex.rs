//! Per-sprite instance data for the sprite pipeline

use bytemuck::{Pod, Zeroable};

use crate::sim::Body;

/// One textured quad, expanded from a unit quad in the vertex shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub rotation: f32,
    pub tint: [f32; 4],
}

impl SpriteInstance {
    pub fn from_body(body: &Body) -> Self {
        Self {
            position: body.pos.to_array(),
            scale: body.scale.to_array(),
            rotation: body.spin,
            tint: body.tint,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32,
            3 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Background color behind the sprites
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.94,
    g: 0.97,
    b: 0.92,
    a: 1.0,
};
