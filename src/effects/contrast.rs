use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/contrast.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ContrastUniforms {
    contrast: f32,
    brightness: f32,
    multiple: f32,
    _pad: f32,
}

/// Luminance-weighted contrast and brightness adjustment.
pub struct ContrastPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    contrast: f32,
    brightness: f32,
    multiple: f32,
}

impl ContrastPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("contrast"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Contrast",
                &SHADER,
                std::mem::size_of::<ContrastUniforms>() as u64,
                false,
            ),
            contrast: 1.0,
            brightness: 1.0,
            multiple: 1.0,
        }
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.contrast = contrast;
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness;
    }

    pub fn multiple(&self) -> f32 {
        self.multiple
    }

    pub fn set_multiple(&mut self, multiple: f32) {
        self.multiple = multiple;
    }
}

impl EffectPass for ContrastPass {
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
        let params = ContrastUniforms {
            contrast: self.contrast,
            brightness: self.brightness,
            multiple: self.multiple,
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
