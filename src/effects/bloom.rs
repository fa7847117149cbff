use std::any::Any;

use crate::error::ChainError;
use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, FrameUniforms, PassSetup, PassToggle, RenderContext};
use crate::quad::{FullscreenQuad, QuadVertex};
use crate::target::{RenderTarget, TargetDesc};

use super::convolution::{self, ConvolutionUniforms, gaussian_kernel};

const COMBINE_SHADER: &str = include_str!("shaders/bloom_combine.wgsl");

/// Glow from a separable Gaussian blur, added back over the image.
///
/// A composite pass: the source is blurred horizontally then vertically
/// through two internal reduced-resolution targets, and the result is
/// combined additively with the unblurred input. The internal targets belong
/// to the pass and are allocated once at construction, which is why this
/// constructor — unlike the single-shader passes — can fail.
pub struct BloomPass {
    toggle: PassToggle,
    x_blur: FilterPass,
    y_blur: FilterPass,
    combine: CombineFilter,
    fbos: [RenderTarget; 2],
    x_increment: [f32; 2],
    y_increment: [f32; 2],
    kernel: Vec<f32>,
}

impl BloomPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Result<Self, ChainError> {
        Self::with_resolution(gpu, setup, 256, [1.0 / 512.0, 0.0], [0.0, 1.0 / 512.0])
    }

    /// `resolution` sizes the internal blur targets; smaller is cheaper and
    /// blurrier. The blur increments are in normalized source coordinates.
    pub fn with_resolution(
        gpu: &GpuContext,
        setup: &PassSetup,
        resolution: u32,
        x_increment: [f32; 2],
        y_increment: [f32; 2],
    ) -> Result<Self, ChainError> {
        let mut glow_size = resolution.max(1);
        if !glow_size.is_power_of_two() {
            glow_size = glow_size.next_power_of_two();
            log::warn!("bloom resolution {resolution} is not a power of two, using {glow_size}");
        }

        // The blurs always sample with normalized coordinates: the first one
        // reads the chain source (whose logical region the uv_scale maps),
        // the second one reads an internal target allocated exactly. That
        // keeps the pass usable in pixel-addressed chains too.
        let params_size = std::mem::size_of::<ConvolutionUniforms>() as u64;
        let x_blur = FilterPass::new(
            gpu,
            setup.format,
            "Bloom X Blur",
            convolution::SHADER.normalized,
            params_size,
            false,
        );
        let y_blur = FilterPass::new(
            gpu,
            setup.format,
            "Bloom Y Blur",
            convolution::SHADER.normalized,
            params_size,
            false,
        );
        let combine = CombineFilter::new(gpu, setup.format);

        let desc = |label| TargetDesc {
            label,
            logical: (glow_size, glow_size),
            allocated: (glow_size, glow_size),
            format: setup.format,
            sample_count: 1,
            with_depth: false,
        };
        let fbos = [
            RenderTarget::new(gpu, &desc("Bloom Glow A"))?,
            RenderTarget::new(gpu, &desc("Bloom Glow B"))?,
        ];

        Ok(Self {
            toggle: PassToggle::new("bloom"),
            x_blur,
            y_blur,
            combine,
            fbos,
            x_increment,
            y_increment,
            kernel: gaussian_kernel(4.0),
        })
    }

    pub fn set_increments(&mut self, x_increment: [f32; 2], y_increment: [f32; 2]) {
        self.x_increment = x_increment;
        self.y_increment = y_increment;
    }

    /// Rebuild the blur kernel for a new sigma.
    pub fn set_sigma(&mut self, sigma: f32) {
        self.kernel = gaussian_kernel(sigma);
    }
}

impl EffectPass for BloomPass {
    fn name(&self) -> &str {
        self.toggle.name()
    }

    fn enabled(&self) -> bool {
        self.toggle.enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.toggle.set(enabled);
    }

    fn render(
        &self,
        ctx: &mut RenderContext,
        source: &wgpu::TextureView,
        destination: &wgpu::TextureView,
        _depth: &wgpu::TextureView,
    ) {
        let chain_frame = ctx.frame;
        let glow = self.fbos[0].logical_size().0 as f32;

        // Downsampling blur of the scene into the first glow target. The
        // source mapping keeps the chain's uv scale.
        let x_frame = FrameUniforms {
            resolution: [glow, glow],
            uv_scale: chain_frame.uv_scale,
            time: chain_frame.time,
            aspect: 1.0,
            _pad: [0.0; 2],
        };
        let x_params = ConvolutionUniforms::new(self.x_increment, &self.kernel);
        self.x_blur.draw(
            ctx,
            &x_frame,
            source,
            self.fbos[0].attachment_view(),
            None,
            Some(bytemuck::bytes_of(&x_params)),
        );

        // Vertical blur between the two internal targets, which are exact
        // allocations: full uv range.
        let y_frame = FrameUniforms {
            resolution: [glow, glow],
            uv_scale: [1.0, 1.0],
            time: chain_frame.time,
            aspect: 1.0,
            _pad: [0.0; 2],
        };
        let y_params = ConvolutionUniforms::new(self.y_increment, &self.kernel);
        self.y_blur.draw(
            ctx,
            &y_frame,
            self.fbos[0].sampled_view(),
            self.fbos[1].attachment_view(),
            None,
            Some(bytemuck::bytes_of(&y_params)),
        );

        // Base image plus upsampled glow.
        self.combine.draw(
            ctx,
            &chain_frame,
            source,
            self.fbos[1].sampled_view(),
            destination,
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Additive combine of the unblurred base and the glow texture.
struct CombineFilter {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl CombineFilter {
    fn new(gpu: &GpuContext, format: wgpu::TextureFormat) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Combine"),
            source: wgpu::ShaderSource::Wgsl(COMBINE_SHADER.into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bloom Combine"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Combine"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Combine"),
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
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bloom Combine"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Bloom Combine"),
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
        }
    }

    fn draw(
        &self,
        ctx: &mut RenderContext,
        frame: &FrameUniforms,
        base: &wgpu::TextureView,
        glow: &wgpu::TextureView,
        destination: &wgpu::TextureView,
    ) {
        ctx.gpu
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[*frame]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(base),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(glow),
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

        pass.set_viewport(0.0, 0.0, frame.resolution[0], frame.resolution[1], 0.0, 1.0);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        ctx.quad.bind(&mut pass);
        pass.draw(0..FullscreenQuad::VERTEX_COUNT, 0..1);
    }
}
