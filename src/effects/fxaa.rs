use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/fxaa.wgsl"),
    pixel: None,
};

/// Fast approximate anti-aliasing, parameter-free.
pub struct FxaaPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
}

impl FxaaPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("fxaa"),
            filter: FilterPass::for_mode(gpu, setup, "FXAA", &SHADER, 0, false),
        }
    }
}

impl EffectPass for FxaaPass {
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
        let frame = ctx.frame;
        filter.draw(ctx, &frame, source, destination, None, None);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
