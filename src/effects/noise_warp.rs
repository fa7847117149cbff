use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/noise_warp.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct NoiseWarpUniforms {
    frequency: f32,
    amplitude: f32,
    speed: f32,
    _pad: f32,
}

/// Animated simplex-noise distortion of the sampling coordinates.
pub struct NoiseWarpPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    frequency: f32,
    amplitude: f32,
    speed: f32,
}

impl NoiseWarpPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("noisewarp"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Noise Warp",
                &SHADER,
                std::mem::size_of::<NoiseWarpUniforms>() as u64,
                false,
            ),
            frequency: 4.0,
            amplitude: 0.1,
            speed: 0.1,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

impl EffectPass for NoiseWarpPass {
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
        self.filter.is_some()
    }

    fn render(
        &self,
        ctx: &mut RenderContext,
        source: &wgpu::TextureView,
        destination: &wgpu::TextureView,
        _depth: &wgpu::TextureView,
    ) {
        let Some(filter) = &self.filter else { return };
        let params = NoiseWarpUniforms {
            frequency: self.frequency,
            amplitude: self.amplitude,
            speed: self.speed,
            _pad: 0.0,
        };
        let frame = ctx.frame;
        filter.draw(
            ctx,
            &frame,
            source,
            destination,
            None,
            Some(bytemuck::bytes_of(&params)),
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
