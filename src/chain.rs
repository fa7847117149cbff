//! The chain orchestrator: capture, process, present.
//!
//! [`EffectChain`] owns the three render targets, the pass registry and the
//! shared quad geometry, and walks enabled passes in registry order each
//! frame, alternating the two ping-pong buffers as read and write so an
//! arbitrary number of passes runs without allocating anything per pass.
//!
//! # Lifecycle
//!
//! The chain is a three-step state machine: **Idle** → `begin_capture` →
//! **Capturing** (the caller records scene draws into the raw target) →
//! `end_capture` → **Idle**, with a processed frame available until the next
//! capture.
//!
//! ```no_run
//! use afterimage::{ChainConfig, EffectChain, GpuContext};
//! use afterimage::effects::FxaaPass;
//!
//! let gpu = GpuContext::headless().unwrap();
//! let mut chain = EffectChain::new(&gpu, ChainConfig::new(1280, 720)).unwrap();
//! chain.add_pass(FxaaPass::new(&gpu, &chain.pass_setup())).unwrap();
//!
//! let scene_pass = chain.begin_capture(&gpu, 0.0).unwrap();
//! // ... record scene draws into `scene_pass` ...
//! chain.end_capture(&gpu).unwrap();
//! let handle = chain.output();
//! let processed = chain.output_view(handle).unwrap();
//! ```
//!
//! # Buffer management
//!
//! The first enabled pass reads the raw scene target; every later pass reads
//! the ping-pong buffer the previous pass just wrote and writes the other
//! one. Source and destination are distinct targets for every invocation —
//! a pass never reads the texture it is writing.
//!
//! ```text
//! Pass 0: Raw    → Ping B
//! Pass 1: Ping B → Ping A
//! Pass 2: Ping A → Ping B
//! present: Ping B → screen
//! ```

use glam::Mat4;

use crate::blit::Blitter;
use crate::camera::Camera;
use crate::error::ChainError;
use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FrameUniforms, PassSetup, RenderContext};
use crate::quad::FullscreenQuad;
use crate::registry::PassRegistry;
use crate::target::{FrameBuffers, RenderTarget, allocated_extent};

/// How effect shaders address the chain's textures.
///
/// `Normalized` is the default: sampling coordinates in `[0, 1]`, targets
/// padded up to power-of-two sizes for compatibility with that convention.
/// `Pixel` addresses by integer texel and allocates exact sizes; only passes
/// that ship a pixel-addressed shader variant can run in such a chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddressingMode {
    #[default]
    Normalized,
    Pixel,
}

/// Construction-time configuration for an [`EffectChain`].
#[derive(Clone, Copy, Debug)]
pub struct ChainConfig {
    /// Logical output width in pixels. Must be non-zero.
    pub width: u32,
    /// Logical output height in pixels. Must be non-zero.
    pub height: u32,
    pub addressing: AddressingMode,
    /// Multisample count for the raw scene target. `0` and `1` both mean no
    /// multisampling. With multisampling on, scene color is resolved before
    /// the chain runs, but no resolved depth exists — depth-consuming passes
    /// report themselves incompatible.
    pub sample_count: u32,
    /// Color format shared by all three targets.
    pub format: wgpu::TextureFormat,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            addressing: AddressingMode::Normalized,
            sample_count: 0,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }
}

impl ChainConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_addressing(mut self, addressing: AddressingMode) -> Self {
        self.addressing = addressing;
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ChainError> {
        if self.width == 0 || self.height == 0 {
            return Err(ChainError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !matches!(self.sample_count, 0 | 1 | 2 | 4 | 8) {
            return Err(ChainError::UnsupportedSampleCount(self.sample_count));
        }
        Ok(())
    }

    pub(crate) fn effective_sample_count(&self) -> u32 {
        self.sample_count.max(1)
    }

    /// Texture size actually allocated for these dimensions.
    pub fn allocated_size(&self) -> (u32, u32) {
        allocated_extent(self.addressing, self.width, self.height)
    }
}

/// View and projection matrices snapshotted at `begin_capture_with_camera`.
#[derive(Clone, Copy, Debug)]
pub struct SceneMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

/// A destination the processed output can be presented into, usually the
/// surface texture of a window.
pub struct ScreenTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

/// Generation-stamped handle to the processed output.
///
/// Handles are `Copy` and survive across frames, but not across `reinit`:
/// resolving a handle taken before a reinit fails with
/// [`ChainError::StaleOutput`] instead of silently referring to a freed
/// texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputHandle {
    generation: u64,
}

enum CaptureState {
    Idle,
    Capturing {
        encoder: wgpu::CommandEncoder,
        scene_pass: wgpu::RenderPass<'static>,
    },
}

/// Which physical buffer a chain step touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BufferRole {
    Raw,
    Ping(usize),
}

#[derive(Clone, Copy, Debug)]
struct ChainStep {
    pass_index: usize,
    source: BufferRole,
    destination: BufferRole,
}

/// Pure schedule for one chain walk: which pass reads which buffer and
/// writes which. The first runnable pass always reads the raw target.
fn chain_steps(runnable: &[bool], start_read: usize) -> (Vec<ChainStep>, usize) {
    let mut steps = Vec::new();
    let mut read = start_read;
    for (pass_index, &on) in runnable.iter().enumerate() {
        if !on {
            continue;
        }
        let source = if steps.is_empty() {
            BufferRole::Raw
        } else {
            BufferRole::Ping(read)
        };
        let destination = BufferRole::Ping(1 - read);
        steps.push(ChainStep {
            pass_index,
            source,
            destination,
        });
        read = 1 - read;
    }
    (steps, read)
}

/// The post-processing orchestrator.
///
/// Owns the frame buffers, the pass registry, the shared quad and the
/// presentation blitter. All GPU submission happens on the thread calling
/// into the chain; the pass loop has a strict sequential data dependency, so
/// there is nothing to parallelize within a frame.
pub struct EffectChain {
    config: ChainConfig,
    buffers: FrameBuffers,
    registry: PassRegistry,
    quad: FullscreenQuad,
    blitter: Blitter,
    state: CaptureState,
    current_read: usize,
    processed_passes: u32,
    generation: u64,
    captured: bool,
    flip: bool,
    clear_color: wgpu::Color,
    time: f32,
    scene_matrices: Option<SceneMatrices>,
}

impl EffectChain {
    /// Allocate the chain's targets and supporting resources.
    ///
    /// Fails on zero dimensions, an unsupported sample count, or GPU
    /// allocation failure; nothing partially-initialized is left behind in
    /// any of those cases.
    pub fn new(gpu: &GpuContext, config: ChainConfig) -> Result<Self, ChainError> {
        let buffers = FrameBuffers::allocate(gpu, &config)?;
        Ok(Self {
            config,
            buffers,
            registry: PassRegistry::new(),
            quad: FullscreenQuad::new(gpu),
            blitter: Blitter::new(gpu),
            state: CaptureState::Idle,
            current_read: 0,
            processed_passes: 0,
            generation: 0,
            captured: false,
            flip: false,
            clear_color: wgpu::Color::BLACK,
            time: 0.0,
            scene_matrices: None,
        })
    }

    /// Replace all three targets with a new size.
    ///
    /// This is the resize path: there is no incremental resizing, a reinit is
    /// a full reallocation. The registry is kept, so the pixel format,
    /// addressing mode and sample count — which every registered pass baked
    /// into its pipeline — must not change. Output handles taken before the
    /// reinit become stale.
    pub fn reinit(&mut self, gpu: &GpuContext, config: ChainConfig) -> Result<(), ChainError> {
        if matches!(self.state, CaptureState::Capturing { .. }) {
            return Err(ChainError::AlreadyCapturing);
        }
        if config.format != self.config.format
            || config.addressing != self.config.addressing
            || config.effective_sample_count() != self.config.effective_sample_count()
        {
            return Err(ChainError::IncompatibleReinit);
        }

        // Allocate the replacement set before dropping the old one, so a
        // failed reinit leaves the chain fully usable.
        let buffers = FrameBuffers::allocate(gpu, &config)?;
        self.buffers = buffers;
        self.config = config;
        self.generation += 1;
        self.current_read = 0;
        self.processed_passes = 0;
        self.captured = false;
        Ok(())
    }

    /// Construction-time facts for building passes against this chain.
    pub fn pass_setup(&self) -> PassSetup {
        PassSetup {
            format: self.config.format,
            addressing: self.config.addressing,
            logical_size: (self.config.width, self.config.height),
            sample_count: self.config.effective_sample_count(),
        }
    }

    /// Register a pass at the end of the chain.
    ///
    /// A pass without a shader variant for this chain's configuration is
    /// still registered — it is logged once here and then skipped by every
    /// `process`, exactly as if it were disabled. Duplicate names are
    /// rejected.
    pub fn add_pass<P: EffectPass>(&mut self, pass: P) -> Result<usize, ChainError> {
        if !pass.compatible() {
            log::warn!(
                "effect pass '{}' has no variant for {:?} addressing at {} sample(s); it will never run",
                pass.name(),
                self.config.addressing,
                self.config.effective_sample_count(),
            );
        }
        self.registry.insert(Box::new(pass))
    }

    /// The ordered pass registry, for lookups and parameter tweaks.
    pub fn passes(&self) -> &PassRegistry {
        &self.registry
    }

    pub fn passes_mut(&mut self) -> &mut PassRegistry {
        &mut self.registry
    }

    /// Logical output size in pixels.
    pub fn logical_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Size of the textures actually allocated.
    pub fn allocated_size(&self) -> (u32, u32) {
        self.config.allocated_size()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// The raw scene target, including its depth buffer.
    pub fn raw_target(&self) -> &RenderTarget {
        self.buffers.raw()
    }

    /// Number of passes that actually executed in the last chain walk.
    pub fn processed_passes(&self) -> u32 {
        self.processed_passes
    }

    /// Flip the image vertically at presentation time. Off by default; turn
    /// it on when the host's camera convention needs it.
    pub fn set_flip(&mut self, flip: bool) {
        self.flip = flip;
    }

    /// Clear color for the raw target at `begin_capture`.
    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Matrices snapshotted by the last `begin_capture_with_camera`.
    pub fn scene_matrices(&self) -> Option<SceneMatrices> {
        self.scene_matrices
    }

    /// Open a capture: all draws recorded into the returned render pass land
    /// in the raw scene target.
    ///
    /// The pass comes with color and depth cleared and the viewport set to
    /// the logical region. Errors if a capture is already open.
    pub fn begin_capture(
        &mut self,
        gpu: &GpuContext,
        time: f32,
    ) -> Result<&mut wgpu::RenderPass<'static>, ChainError> {
        self.begin(gpu, time, None)
    }

    /// Like [`begin_capture`](Self::begin_capture), additionally snapshotting
    /// the camera's view and projection (parameterized by the logical aspect)
    /// for the caller's scene pipelines to read via
    /// [`scene_matrices`](Self::scene_matrices).
    pub fn begin_capture_with_camera(
        &mut self,
        gpu: &GpuContext,
        time: f32,
        camera: &Camera,
    ) -> Result<&mut wgpu::RenderPass<'static>, ChainError> {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let matrices = SceneMatrices {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
        };
        self.begin(gpu, time, Some(matrices))
    }

    fn begin(
        &mut self,
        gpu: &GpuContext,
        time: f32,
        matrices: Option<SceneMatrices>,
    ) -> Result<&mut wgpu::RenderPass<'static>, ChainError> {
        if matches!(self.state, CaptureState::Capturing { .. }) {
            return Err(ChainError::AlreadyCapturing);
        }
        self.time = time;
        self.scene_matrices = matrices;

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Afterimage Capture"),
            });

        let raw = self.buffers.raw();
        let mut scene_pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Afterimage Scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: raw.attachment_view(),
                    resolve_target: raw.resolve_view(),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.buffers.scene_depth(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        scene_pass.set_viewport(
            0.0,
            0.0,
            self.config.width as f32,
            self.config.height as f32,
            0.0,
            1.0,
        );

        self.state = CaptureState::Capturing { encoder, scene_pass };
        match &mut self.state {
            CaptureState::Capturing { scene_pass, .. } => Ok(scene_pass),
            CaptureState::Idle => unreachable!(),
        }
    }

    fn close_capture(&mut self) -> Result<wgpu::CommandEncoder, ChainError> {
        match std::mem::replace(&mut self.state, CaptureState::Idle) {
            CaptureState::Capturing {
                encoder,
                scene_pass,
            } => {
                // The render pass must end before the encoder can record the
                // chain; dropping it closes the scoped acquisition opened by
                // `begin`.
                drop(scene_pass);
                Ok(encoder)
            }
            CaptureState::Idle => Err(ChainError::NotCapturing),
        }
    }

    /// Close the capture and run the chain. The processed output is then
    /// queryable via [`output`](Self::output) without being drawn anywhere.
    pub fn end_capture(&mut self, gpu: &GpuContext) -> Result<(), ChainError> {
        let mut encoder = self.close_capture()?;
        self.captured = true;
        self.run_chain(gpu, &mut encoder);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Close the capture, run the chain, and immediately present the result
    /// at the screen origin, sized to the logical output.
    pub fn end_capture_present(
        &mut self,
        gpu: &GpuContext,
        screen: &ScreenTarget,
    ) -> Result<(), ChainError> {
        let mut encoder = self.close_capture()?;
        self.captured = true;
        self.run_chain(gpu, &mut encoder);
        let (w, h) = self.logical_size();
        self.record_present(gpu, &mut encoder, screen, [0.0, 0.0, w as f32, h as f32]);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Re-run the chain over the last captured frame.
    ///
    /// Useful after toggling passes without re-rendering the scene. Errors if
    /// a capture is open or nothing was ever captured.
    pub fn process(&mut self, gpu: &GpuContext) -> Result<(), ChainError> {
        if matches!(self.state, CaptureState::Capturing { .. }) {
            return Err(ChainError::AlreadyCapturing);
        }
        if !self.captured {
            return Err(ChainError::NothingCaptured);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Afterimage Process"),
            });
        self.run_chain(gpu, &mut encoder);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Walk enabled passes in registry order. Strictly sequential: each
    /// pass's output is the next pass's input.
    fn run_chain(&mut self, gpu: &GpuContext, encoder: &mut wgpu::CommandEncoder) {
        let runnable: Vec<bool> = self
            .registry
            .iter()
            .map(|p| p.enabled() && p.compatible())
            .collect();
        let (steps, read_after) = chain_steps(&runnable, self.current_read);

        let raw = self.buffers.raw();
        let frame = FrameUniforms {
            resolution: [self.config.width as f32, self.config.height as f32],
            uv_scale: raw.uv_scale(),
            time: self.time,
            aspect: self.config.width as f32 / self.config.height as f32,
            _pad: [0.0; 2],
        };
        let depth = self.buffers.scene_depth();

        for step in &steps {
            let Some(pass) = self.registry.get(step.pass_index) else {
                continue;
            };
            let source = match step.source {
                BufferRole::Raw => raw.sampled_view(),
                BufferRole::Ping(i) => self.buffers.ping(i).sampled_view(),
            };
            let destination = match step.destination {
                BufferRole::Raw => raw.attachment_view(),
                BufferRole::Ping(i) => self.buffers.ping(i).attachment_view(),
            };

            let mut ctx = RenderContext {
                gpu,
                encoder: &mut *encoder,
                quad: &self.quad,
                frame,
            };
            pass.render(&mut ctx, source, destination, depth);
        }

        self.current_read = read_after;
        self.processed_passes = steps.len() as u32;
    }

    /// Handle to the processed output, stamped with the current generation.
    pub fn output(&self) -> OutputHandle {
        OutputHandle {
            generation: self.generation,
        }
    }

    /// Resolve an output handle to the processed color texture.
    ///
    /// With zero passes executed this is the raw capture itself — the chain
    /// degrades to a plain off-screen renderer. The view is borrowed from
    /// the chain and valid until the next `begin_capture` or `reinit`; a
    /// handle from before a `reinit` resolves to [`ChainError::StaleOutput`].
    pub fn output_view(&self, handle: OutputHandle) -> Result<&wgpu::TextureView, ChainError> {
        if handle.generation != self.generation {
            return Err(ChainError::StaleOutput {
                handle: handle.generation,
                current: self.generation,
            });
        }
        Ok(self.current_output_view())
    }

    fn current_output_view(&self) -> &wgpu::TextureView {
        if self.processed_passes > 0 {
            self.buffers.ping(self.current_read).sampled_view()
        } else {
            self.buffers.raw().sampled_view()
        }
    }

    /// The target currently holding the processed output, for readback.
    pub fn output_target(&self) -> &RenderTarget {
        if self.processed_passes > 0 {
            self.buffers.ping(self.current_read)
        } else {
            self.buffers.raw()
        }
    }

    /// Present the processed output at the screen origin, logical size.
    pub fn present(&mut self, gpu: &GpuContext, screen: &ScreenTarget) -> Result<(), ChainError> {
        let (w, h) = self.logical_size();
        self.present_rect(gpu, screen, 0.0, 0.0, w as f32, h as f32)
    }

    /// Present at a position, logical size.
    pub fn present_at(
        &mut self,
        gpu: &GpuContext,
        screen: &ScreenTarget,
        x: f32,
        y: f32,
    ) -> Result<(), ChainError> {
        let (w, h) = self.logical_size();
        self.present_rect(gpu, screen, x, y, w as f32, h as f32)
    }

    /// Present into an arbitrary rectangle of the screen target.
    ///
    /// The rectangle must lie within the screen bounds. Presenting twice
    /// without an intervening capture draws the identical image both times;
    /// the processed output is stable between chain walks.
    pub fn present_rect(
        &mut self,
        gpu: &GpuContext,
        screen: &ScreenTarget,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<(), ChainError> {
        if matches!(self.state, CaptureState::Capturing { .. }) {
            return Err(ChainError::AlreadyCapturing);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Afterimage Present"),
            });
        self.record_present(gpu, &mut encoder, screen, [x, y, w, h]);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn record_present(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        screen: &ScreenTarget,
        rect: [f32; 4],
    ) {
        let uv_scale = self.output_target().uv_scale();
        let source = if self.processed_passes > 0 {
            self.buffers.ping(self.current_read).sampled_view()
        } else {
            self.buffers.raw().sampled_view()
        };
        self.blitter.blit(
            gpu,
            encoder,
            &self.quad,
            source,
            screen.view,
            screen.format,
            rect,
            uv_scale,
            self.flip,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(steps: &[ChainStep]) -> Vec<BufferRole> {
        steps.iter().map(|s| s.source).collect()
    }

    #[test]
    fn zero_enabled_passes_schedule_nothing() {
        let (steps, read) = chain_steps(&[false, false, false], 0);
        assert!(steps.is_empty());
        assert_eq!(read, 0);
    }

    #[test]
    fn schedules_exactly_the_enabled_passes() {
        for enabled_count in 0..5 {
            let mut flags = vec![false; 6];
            for flag in flags.iter_mut().take(enabled_count) {
                *flag = true;
            }
            let (steps, _) = chain_steps(&flags, 0);
            assert_eq!(steps.len(), enabled_count);
        }
    }

    #[test]
    fn first_enabled_pass_reads_raw_even_mid_registry() {
        // Registry of 3, only the middle pass enabled: it must read the raw
        // target directly, not a ping-pong buffer.
        let (steps, _) = chain_steps(&[false, true, false], 0);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].pass_index, 1);
        assert_eq!(steps[0].source, BufferRole::Raw);
        assert_eq!(steps[0].destination, BufferRole::Ping(1));
    }

    #[test]
    fn source_and_destination_never_alias() {
        for start_read in 0..2 {
            let flags = vec![true; 9];
            let (steps, _) = chain_steps(&flags, start_read);
            for step in &steps {
                assert_ne!(step.source, step.destination, "aliased step: {step:?}");
                assert_ne!(step.destination, BufferRole::Raw);
            }
        }
    }

    #[test]
    fn consecutive_passes_chain_outputs() {
        let (steps, read_after) = chain_steps(&[true, true, true], 0);
        assert_eq!(sources(&steps), [
            BufferRole::Raw,
            BufferRole::Ping(1),
            BufferRole::Ping(0),
        ]);
        // The final write landed in ping(1); the read index must point at it.
        assert_eq!(steps[2].destination, BufferRole::Ping(read_after));
    }

    #[test]
    fn schedule_follows_registry_order_not_enable_order() {
        let (steps, _) = chain_steps(&[true, false, true, true], 0);
        let order: Vec<usize> = steps.iter().map(|s| s.pass_index).collect();
        assert_eq!(order, [0, 2, 3]);
    }

    #[test]
    fn config_rejects_zero_dimensions() {
        assert!(matches!(
            ChainConfig::new(0, 600).validate(),
            Err(ChainError::ZeroDimensions { .. })
        ));
        assert!(matches!(
            ChainConfig::new(800, 0).validate(),
            Err(ChainError::ZeroDimensions { .. })
        ));
        assert!(ChainConfig::new(800, 600).validate().is_ok());
    }

    #[test]
    fn config_rejects_odd_sample_counts() {
        assert!(matches!(
            ChainConfig::new(64, 64).with_sample_count(3).validate(),
            Err(ChainError::UnsupportedSampleCount(3))
        ));
        for count in [0, 1, 2, 4, 8] {
            assert!(ChainConfig::new(64, 64).with_sample_count(count).validate().is_ok());
        }
    }

    #[test]
    fn allocated_size_tracks_addressing_mode() {
        let normalized = ChainConfig::new(800, 600);
        assert_eq!(normalized.allocated_size(), (1024, 1024));
        let pixel = ChainConfig::new(800, 600).with_addressing(AddressingMode::Pixel);
        assert_eq!(pixel.allocated_size(), (800, 600));
    }
}
