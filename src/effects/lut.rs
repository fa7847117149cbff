use std::any::Any;

use crate::chain::AddressingMode;
use crate::error::ChainError;
use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FrameUniforms, PassSetup, PassToggle, RenderContext};
use crate::quad::{FullscreenQuad, QuadVertex};

const SHADER: &str = include_str!("shaders/lut.wgsl");

/// A parsed 3D color lookup table.
///
/// The on-disk format is tabular RGB triples keyed by a `LUT_3D_SIZE` header
/// (the `.cube` convention): comment lines start with `#`, unrecognized
/// keyword lines are ignored, the red axis varies fastest. Files with no
/// header are assumed to be 32 entries per axis.
pub struct Lut3d {
    size: u32,
    data: Vec<[f32; 3]>,
}

impl Lut3d {
    pub fn parse(text: &str) -> Result<Self, ChainError> {
        let mut size: u32 = 0;
        let mut data = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
                size = rest
                    .trim()
                    .parse()
                    .map_err(|_| ChainError::LutParse(format!("bad LUT_3D_SIZE line: '{line}'")))?;
                continue;
            }
            let mut fields = line.split_whitespace().map(str::parse::<f32>);
            if let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) =
                (fields.next(), fields.next(), fields.next())
            {
                data.push([r, g, b]);
            }
        }

        if size == 0 {
            size = 32;
        }
        let expected = (size * size * size) as usize;
        if data.len() != expected {
            return Err(ChainError::LutParse(format!(
                "expected {expected} entries for size {size}, found {}",
                data.len()
            )));
        }

        Ok(Self { size, data })
    }

    /// The identity table: maps every color to itself.
    pub fn identity(size: u32) -> Self {
        let size = size.max(2);
        let step = 1.0 / (size - 1) as f32;
        let mut data = Vec::with_capacity((size * size * size) as usize);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Self { size, data }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for rgb in &self.data {
            for channel in rgb {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            bytes.push(255);
        }
        bytes
    }
}

/// Color grading through a trilinearly-interpolated 3D lookup table.
pub struct LutPass {
    toggle: PassToggle,
    inner: Option<LutInner>,
}

struct LutInner {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    lut_sampler: wgpu::Sampler,
    lut_view: wgpu::TextureView,
}

impl LutPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup, table: &Lut3d) -> Self {
        let inner = (setup.addressing == AddressingMode::Normalized)
            .then(|| LutInner::new(gpu, setup.format, table));
        Self {
            toggle: PassToggle::new("lut"),
            inner,
        }
    }

    /// Build from `.cube`-style text, e.g. `include_str!` or a loaded file.
    pub fn from_cube_str(gpu: &GpuContext, setup: &PassSetup, text: &str) -> Result<Self, ChainError> {
        let table = Lut3d::parse(text)?;
        Ok(Self::new(gpu, setup, &table))
    }

    /// Swap in a different table.
    pub fn set_table(&mut self, gpu: &GpuContext, table: &Lut3d) {
        if let Some(inner) = &mut self.inner {
            inner.lut_view = LutInner::upload_table(gpu, table);
        }
    }
}

impl EffectPass for LutPass {
    fn name(&self) -> &str {
        self.toggle.name()
    }

    fn enabled(&self) -> bool {
        self.toggle.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.toggle.set(enabled);
    }

    fn compatible(&self) -> bool {
        self.inner.is_some()
    }

    fn render(
        &self,
        ctx: &mut RenderContext,
        source: &wgpu::TextureView,
        destination: &wgpu::TextureView,
        _depth: &wgpu::TextureView,
    ) {
        let Some(inner) = &self.inner else { return };

        ctx.gpu
            .queue
            .write_buffer(&inner.frame_buffer, 0, bytemuck::cast_slice(&[ctx.frame]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &inner.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: inner.frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&inner.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&inner.lut_view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&inner.lut_sampler),
                },
            ],
        });

        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: destination,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_viewport(
            0.0,
            0.0,
            ctx.frame.resolution[0],
            ctx.frame.resolution[1],
            0.0,
            1.0,
        );
        pass.set_pipeline(&inner.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        ctx.quad.bind(&mut pass);
        pass.draw(0..FullscreenQuad::VERTEX_COUNT, 0..1);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl LutInner {
    fn new(gpu: &GpuContext, format: wgpu::TextureFormat, table: &Lut3d) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("LUT Grade"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("LUT Grade"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("LUT Source Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let lut_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("LUT Table Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let lut_view = Self::upload_table(gpu, table);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("LUT Grade"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D3,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("LUT Grade"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("LUT Grade"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[QuadVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_buffer,
            bind_group_layout,
            sampler,
            lut_sampler,
            lut_view,
        }
    }

    fn upload_table(gpu: &GpuContext, table: &Lut3d) -> wgpu::TextureView {
        let n = table.size;
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("LUT Table"),
            size: wgpu::Extent3d {
                width: n,
                height: n,
                depth_or_array_layers: n,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            texture.as_image_copy(),
            &table.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * n),
                rows_per_image: Some(n),
            },
            wgpu::Extent3d {
                width: n,
                height: n,
                depth_or_array_layers: n,
            },
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cube_text_with_header_and_comments() {
        let text = "\
# tiny test cube
TITLE \"test\"
LUT_3D_SIZE 2

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
";
        let lut = Lut3d::parse(text).unwrap();
        assert_eq!(lut.size(), 2);
        assert_eq!(lut.data.len(), 8);
        assert_eq!(lut.data[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_wrong_entry_count() {
        let text = "LUT_3D_SIZE 2\n0 0 0\n1 1 1\n";
        assert!(matches!(Lut3d::parse(text), Err(ChainError::LutParse(_))));
    }

    #[test]
    fn rejects_malformed_header() {
        let text = "LUT_3D_SIZE banana\n";
        assert!(matches!(Lut3d::parse(text), Err(ChainError::LutParse(_))));
    }

    #[test]
    fn identity_table_maps_corners_to_themselves() {
        let lut = Lut3d::identity(2);
        assert_eq!(lut.data[0], [0.0, 0.0, 0.0]);
        assert_eq!(lut.data[7], [1.0, 1.0, 1.0]);
        // Red varies fastest.
        assert_eq!(lut.data[1], [1.0, 0.0, 0.0]);
        assert_eq!(lut.data[2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn rgba8_conversion_clamps() {
        let lut = Lut3d {
            size: 2,
            data: vec![[-1.0, 0.5, 2.0]; 8],
        };
        let bytes = lut.to_rgba8();
        assert_eq!(&bytes[0..4], &[0, 128, 255, 255]);
    }
}
