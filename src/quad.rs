//! The shared full-screen quad geometry.
//!
//! Every effect pass and the final blit draw the same two-triangle quad
//! covering normalized device coordinates. The quad is created once when the
//! chain is built and threaded explicitly through every render call — there is
//! no hidden global mesh.

use crate::gpu::GpuContext;

/// Vertex for full-screen quad rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two triangles covering NDC, with uv origin at the top-left.
const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
];

/// GPU-resident full-screen quad, created once per chain.
pub struct FullscreenQuad {
    buffer: wgpu::Buffer,
}

impl FullscreenQuad {
    pub const VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

    pub fn new(gpu: &GpuContext) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Fullscreen Quad"),
                contents: bytemuck::cast_slice(QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self { buffer }
    }

    /// Bind the quad to vertex slot 0 of an open render pass.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
    }
}
