//! The effect pass contract and shared fullscreen-filter plumbing.
//!
//! Every effect in the chain — bloom, blur, FXAA, depth of field, the lot —
//! satisfies one contract: [`EffectPass`]. A pass transforms one color image
//! (and optionally the raw scene depth) into another color image of identical
//! dimensions with a single full-screen-quad draw. The chain dispatches all
//! passes uniformly through the trait and never special-cases a concrete
//! effect.
//!
//! Most effects are a single shader over a single input, so the heavy lifting
//! lives in [`FilterPass`]: it owns the render pipeline, the per-frame
//! uniform buffer, an optional per-pass parameter buffer, and the input
//! sampler. A concrete effect holds one (or several, for composites like
//! bloom) and feeds it a packed `#[repr(C)]` parameter struct each draw.
//!
//! # Shader interface
//!
//! Filter shaders are WGSL with `vs`/`fs` entry points and this binding
//! layout:
//!
//! ```wgsl
//! struct FrameUniforms {
//!     resolution: vec2f, // logical size in pixels
//!     uv_scale: vec2f,   // logical / allocated, for padded targets
//!     time: f32,
//!     aspect: f32,
//!     _pad: vec2f,
//! }
//! @group(0) @binding(0) var<uniform> frame: FrameUniforms;
//! @group(0) @binding(1) var source_tex: texture_2d<f32>;
//! @group(0) @binding(2) var source_samp: sampler;
//! // optional, when the pass declares a parameter struct:
//! @group(0) @binding(3) var<uniform> params: MyParams;
//! // optional, when the pass samples scene depth:
//! @group(0) @binding(4) var depth_tex: texture_depth_2d;
//! @group(0) @binding(5) var depth_samp: sampler;
//! ```
//!
//! The vertex stage passes uv through in logical `[0,1]` space; fragment
//! stages multiply by `frame.uv_scale` at every sample so warping effects can
//! work in logical coordinates.

use std::any::Any;

use crate::chain::AddressingMode;
use crate::gpu::GpuContext;
use crate::params::{ParamDesc, ParamValue};
use crate::quad::{FullscreenQuad, QuadVertex};

/// Per-frame uniforms available to every filter shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Logical render size in pixels `[width, height]`.
    pub resolution: [f32; 2],
    /// Fraction of the allocated texture the logical region covers.
    pub uv_scale: [f32; 2],
    /// Elapsed time in seconds, as passed to `begin_capture`.
    pub time: f32,
    /// Logical aspect ratio (width / height).
    pub aspect: f32,
    /// Padding for 16-byte alignment.
    pub _pad: [f32; 2],
}

/// Construction-time facts a pass needs to compile its pipeline.
///
/// Obtained from [`EffectChain::pass_setup`](crate::EffectChain::pass_setup);
/// every concrete pass constructor takes one.
#[derive(Clone, Copy, Debug)]
pub struct PassSetup {
    /// Color format of all three chain targets.
    pub format: wgpu::TextureFormat,
    /// The chain's texture addressing mode.
    pub addressing: AddressingMode,
    /// Logical output size in pixels.
    pub logical_size: (u32, u32),
    /// Sample count of the raw scene target. When above 1 there is no
    /// resolved depth texture, so depth-consuming passes cannot run.
    pub sample_count: u32,
}

/// Everything a pass needs during one `render` call.
///
/// Created fresh for each chain walk; the lifetime ties every reference to
/// the frame's scope, so passes cannot retain resources past the call.
pub struct RenderContext<'a> {
    /// GPU context providing device and queue access.
    pub gpu: &'a GpuContext,
    /// Command encoder the pass appends its render pass to.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// The shared full-screen quad.
    pub quad: &'a FullscreenQuad,
    /// Per-frame uniform values for the chain's logical output.
    pub frame: FrameUniforms,
}

/// The contract every effect in the chain satisfies.
///
/// Implementations are exclusively owned by the chain's registry, created
/// once during setup and dispatched in insertion order. `render` must fully
/// overwrite the destination and leave the source untouched; the chain
/// guarantees source and destination are distinct targets.
pub trait EffectPass: Any {
    /// Display name, unique within one chain; the key for name-based toggling.
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    /// Pure state toggle. Disabled passes are skipped entirely by the chain:
    /// no GPU work, no uniform evaluation.
    fn set_enabled(&mut self, enabled: bool);

    /// Whether this pass compiled a shader variant usable with the chain it
    /// was built for. Consulted once at registration, not per frame; an
    /// incompatible pass behaves as permanently disabled.
    fn compatible(&self) -> bool {
        true
    }

    /// Record one full-screen transform from `source` into `destination`.
    ///
    /// `depth` is always the *original* raw-scene depth, never a ping-pong
    /// buffer's — intermediate targets carry no depth. Passes that don't
    /// sample depth simply ignore it.
    fn render(
        &self,
        ctx: &mut RenderContext,
        source: &wgpu::TextureView,
        destination: &wgpu::TextureView,
        depth: &wgpu::TextureView,
    );

    /// Tunable parameters, for hosts that build generic UI. Empty unless the
    /// pass opts into introspection.
    fn parameter_descriptors(&self) -> &[ParamDesc] {
        &[]
    }

    fn parameter(&self, _name: &str) -> Option<ParamValue> {
        None
    }

    /// Returns false when the pass has no parameter by that name or the
    /// value kind doesn't match. Values are not clamped to the descriptor
    /// range.
    fn set_parameter(&mut self, _name: &str, _value: ParamValue) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Display name and enabled flag shared by every effect implementation.
pub struct PassToggle {
    name: &'static str,
    enabled: bool,
}

impl PassToggle {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: true,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// WGSL sources for the addressing modes a filter supports.
///
/// Most effects only ship a normalized-coordinate shader; the blur family
/// also carries a pixel-addressed (`textureLoad`) variant. A missing variant
/// is how a pass ends up incompatible with a pixel-addressed chain.
pub struct ShaderVariants {
    pub normalized: &'static str,
    pub pixel: Option<&'static str>,
}

impl ShaderVariants {
    pub fn source_for(&self, mode: AddressingMode) -> Option<&'static str> {
        match mode {
            AddressingMode::Normalized => Some(self.normalized),
            AddressingMode::Pixel => self.pixel,
        }
    }
}

/// Shared plumbing for single-shader fullscreen filters.
///
/// Owns the pipeline and buffers; stateless between draws. Bind groups are
/// created per draw because the input view changes as the chain ping-pongs.
pub struct FilterPass {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    params_buffer: Option<wgpu::Buffer>,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    depth_sampler: wgpu::Sampler,
    samples_depth: bool,
}

impl FilterPass {
    /// Build the filter variant matching the chain's addressing mode.
    ///
    /// Returns `None` when no shader variant exists for the mode, or when the
    /// filter samples scene depth and the chain is multisampled (there is no
    /// resolved depth to bind). The caller reports this as a capability
    /// mismatch.
    pub fn for_mode(
        gpu: &GpuContext,
        setup: &PassSetup,
        label: &str,
        variants: &ShaderVariants,
        params_size: u64,
        samples_depth: bool,
    ) -> Option<Self> {
        if samples_depth && setup.sample_count > 1 {
            return None;
        }
        let source = variants.source_for(setup.addressing)?;
        Some(Self::new(gpu, setup.format, label, source, params_size, samples_depth))
    }

    /// Build a filter from a single WGSL source, unconditionally.
    ///
    /// Used for internal sub-filters whose inputs the owning pass allocates
    /// itself (bloom's downsampled blurs), where addressing mode is moot.
    pub fn new(
        gpu: &GpuContext,
        format: wgpu::TextureFormat,
        label: &str,
        shader_source: &str,
        params_size: u64,
        samples_depth: bool,
    ) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = (params_size > 0).then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: params_size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Depth textures only pair with non-filtering samplers.
        let depth_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut entries = vec![
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
        ];
        if params_buffer.is_some() {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
        }
        if samples_depth {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 5,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                count: None,
            });
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
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
            params_buffer,
            bind_group_layout,
            sampler,
            depth_sampler,
            samples_depth,
        }
    }

    /// Record one fullscreen draw from `source` into `destination`.
    ///
    /// Clears the destination first, so every pixel of the write target is
    /// overwritten. `frame` is passed explicitly rather than taken from the
    /// context so composite passes can substitute the dimensions of their
    /// internal targets.
    pub fn draw(
        &self,
        ctx: &mut RenderContext,
        frame: &FrameUniforms,
        source: &wgpu::TextureView,
        destination: &wgpu::TextureView,
        depth: Option<&wgpu::TextureView>,
        params: Option<&[u8]>,
    ) {
        ctx.gpu
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[*frame]));
        if let (Some(buffer), Some(bytes)) = (&self.params_buffer, params) {
            ctx.gpu.queue.write_buffer(buffer, 0, bytes);
        }

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: self.frame_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(source),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ];
        if let Some(buffer) = &self.params_buffer {
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: buffer.as_entire_binding(),
            });
        }
        if self.samples_depth {
            let depth = depth.expect("depth-sampling filter drawn without a depth view");
            entries.push(wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::TextureView(depth),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 5,
                resource: wgpu::BindingResource::Sampler(&self.depth_sampler),
            });
        }

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &self.bind_group_layout,
            entries: &entries,
        });

        let mut render_pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
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

        render_pass.set_viewport(
            0.0,
            0.0,
            frame.resolution[0],
            frame.resolution[1],
            0.0,
            1.0,
        );
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        ctx.quad.bind(&mut render_pass);
        render_pass.draw(0..FullscreenQuad::VERTEX_COUNT, 0..1);
    }
}
