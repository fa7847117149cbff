use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/tilt_shift.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct TiltShiftUniforms {
    blur: f32,
    focus_row: f32,
    _pad: [f32; 2],
}

/// Miniature-faking vertical blur, sharpest along one horizontal band.
pub struct TiltShiftPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    blur: f32,
    focus_row: f32,
}

impl TiltShiftPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("verticaltiltshift"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Vertical Tilt Shift",
                &SHADER,
                std::mem::size_of::<TiltShiftUniforms>() as u64,
                false,
            ),
            blur: 2.0 / 512.0,
            focus_row: 0.5,
        }
    }

    pub fn blur(&self) -> f32 {
        self.blur
    }

    pub fn set_blur(&mut self, blur: f32) {
        self.blur = blur;
    }

    pub fn focus_row(&self) -> f32 {
        self.focus_row
    }

    /// Vertical position of the sharp band, in [0, 1].
    pub fn set_focus_row(&mut self, focus_row: f32) {
        self.focus_row = focus_row;
    }
}

impl EffectPass for TiltShiftPass {
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
        let params = TiltShiftUniforms {
            blur: self.blur,
            focus_row: self.focus_row,
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
