use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/bleach_bypass.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BleachBypassUniforms {
    opacity: f32,
    _pad: [f32; 3],
}

/// Silver-retention film look: desaturated highlights, crushed contrast.
pub struct BleachBypassPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    opacity: f32,
}

impl BleachBypassPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("bleachbypass"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Bleach Bypass",
                &SHADER,
                std::mem::size_of::<BleachBypassUniforms>() as u64,
                false,
            ),
            opacity: 1.0,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Blend factor between the untouched image (0) and the full effect (1).
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

impl EffectPass for BleachBypassPass {
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
        let params = BleachBypassUniforms {
            opacity: self.opacity,
            _pad: [0.0; 3],
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
