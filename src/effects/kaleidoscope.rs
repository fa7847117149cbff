use std::any::Any;

use crate::gpu::GpuContext;
use crate::params::{ParamDesc, ParamValue};
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/kaleidoscope.wgsl"),
    pixel: None,
};

const PARAMS: &[ParamDesc] = &[ParamDesc {
    name: "segments",
    min: -20.0,
    max: 20.0,
    default: ParamValue::Float(6.0),
}];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct KaleidoscopeUniforms {
    segments: f32,
    _pad: [f32; 3],
}

/// Mirrors the image into radial segments around the center.
pub struct KaleidoscopePass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    segments: f32,
}

impl KaleidoscopePass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("kaleidoscope"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Kaleidoscope",
                &SHADER,
                std::mem::size_of::<KaleidoscopeUniforms>() as u64,
                false,
            ),
            segments: 6.0,
        }
    }

    pub fn segments(&self) -> f32 {
        self.segments
    }

    pub fn set_segments(&mut self, segments: f32) {
        self.segments = segments;
    }
}

impl EffectPass for KaleidoscopePass {
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
        let params = KaleidoscopeUniforms {
            segments: self.segments,
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

    fn parameter_descriptors(&self) -> &[ParamDesc] {
        PARAMS
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        match name {
            "segments" => Some(ParamValue::Float(self.segments)),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> bool {
        match (name, value) {
            ("segments", ParamValue::Float(v)) => {
                self.segments = v;
                true
            }
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
