use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/limb_darkening.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LimbDarkeningUniforms {
    start_color: [f32; 4],
    end_color: [f32; 4],
    radial_scale: f32,
    brightness: f32,
    _pad: [f32; 2],
}

/// Radial falloff from a bright center to darkened edges.
pub struct LimbDarkeningPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    start_color: [f32; 3],
    end_color: [f32; 3],
    radial_scale: f32,
    brightness: f32,
}

impl LimbDarkeningPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("limbdarkening"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Limb Darkening",
                &SHADER,
                std::mem::size_of::<LimbDarkeningUniforms>() as u64,
                false,
            ),
            start_color: [1.0, 1.0, 1.0],
            end_color: [0.0, 0.0, 0.0],
            radial_scale: 1.2,
            brightness: 2.5,
        }
    }

    pub fn set_start_color(&mut self, color: [f32; 3]) {
        self.start_color = color;
    }

    pub fn set_end_color(&mut self, color: [f32; 3]) {
        self.end_color = color;
    }

    pub fn radial_scale(&self) -> f32 {
        self.radial_scale
    }

    pub fn set_radial_scale(&mut self, radial_scale: f32) {
        self.radial_scale = radial_scale;
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness;
    }
}

impl EffectPass for LimbDarkeningPass {
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
        let params = LimbDarkeningUniforms {
            start_color: [
                self.start_color[0],
                self.start_color[1],
                self.start_color[2],
                1.0,
            ],
            end_color: [self.end_color[0], self.end_color[1], self.end_color[2], 1.0],
            radial_scale: self.radial_scale,
            brightness: self.brightness,
            _pad: [0.0; 2],
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
