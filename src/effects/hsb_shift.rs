use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/hsb_shift.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct HsbShiftUniforms {
    hue_shift: f32,
    saturation_shift: f32,
    brightness_shift: f32,
    _pad: f32,
}

/// Shifts hue, saturation and brightness in HSB space.
pub struct HsbShiftPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    hue_shift: f32,
    saturation_shift: f32,
    brightness_shift: f32,
}

impl HsbShiftPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("hsbshift"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "HSB Shift",
                &SHADER,
                std::mem::size_of::<HsbShiftUniforms>() as u64,
                false,
            ),
            hue_shift: 0.0,
            saturation_shift: 0.0,
            brightness_shift: 0.0,
        }
    }

    pub fn hue_shift(&self) -> f32 {
        self.hue_shift
    }

    /// Hue rotation in turns (1.0 is a full cycle around the wheel).
    pub fn set_hue_shift(&mut self, shift: f32) {
        self.hue_shift = shift;
    }

    pub fn saturation_shift(&self) -> f32 {
        self.saturation_shift
    }

    pub fn set_saturation_shift(&mut self, shift: f32) {
        self.saturation_shift = shift;
    }

    pub fn brightness_shift(&self) -> f32 {
        self.brightness_shift
    }

    pub fn set_brightness_shift(&mut self, shift: f32) {
        self.brightness_shift = shift;
    }
}

impl EffectPass for HsbShiftPass {
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
        let params = HsbShiftUniforms {
            hue_shift: self.hue_shift,
            saturation_shift: self.saturation_shift,
            brightness_shift: self.brightness_shift,
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
