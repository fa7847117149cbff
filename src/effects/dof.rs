use std::any::Any;

use crate::gpu::GpuContext;
use crate::params::{ParamDesc, ParamValue};
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/dof.wgsl"),
    pixel: None,
};

const PARAMS: &[ParamDesc] = &[
    ParamDesc {
        name: "focus",
        min: 0.95,
        max: 1.0,
        default: ParamValue::Float(0.985),
    },
    ParamDesc {
        name: "aperture",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.8),
    },
    ParamDesc {
        name: "max_blur",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.6),
    },
];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DofUniforms {
    focus: f32,
    aperture: f32,
    max_blur: f32,
    _pad: f32,
}

/// Bokeh depth of field: blur radius driven by the distance between each
/// pixel's scene depth and the focus plane.
///
/// Samples the raw scene depth, so it is incompatible with multisampled
/// chains (no resolved depth exists).
pub struct DofPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    focus: f32,
    aperture: f32,
    max_blur: f32,
}

impl DofPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("dof"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Depth Of Field",
                &SHADER,
                std::mem::size_of::<DofUniforms>() as u64,
                true,
            ),
            focus: 0.985,
            aperture: 0.8,
            max_blur: 0.6,
        }
    }

    pub fn focus(&self) -> f32 {
        self.focus
    }

    /// Depth-buffer value of the focal plane. Non-linear depth, so useful
    /// values sit close to 1.0.
    pub fn set_focus(&mut self, focus: f32) {
        self.focus = focus;
    }

    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    /// Bigger values give a shallower depth of field.
    pub fn set_aperture(&mut self, aperture: f32) {
        self.aperture = aperture;
    }

    pub fn max_blur(&self) -> f32 {
        self.max_blur
    }

    pub fn set_max_blur(&mut self, max_blur: f32) {
        self.max_blur = max_blur;
    }
}

impl EffectPass for DofPass {
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
        depth: &wgpu::TextureView,
    ) {
        let Some(filter) = &self.filter else { return };
        let params = DofUniforms {
            focus: self.focus,
            aperture: self.aperture,
            max_blur: self.max_blur,
            _pad: 0.0,
        };
        let frame = ctx.frame;
        filter.draw(
            ctx,
            &frame,
            source,
            destination,
            Some(depth),
            Some(bytemuck::bytes_of(&params)),
        );
    }

    fn parameter_descriptors(&self) -> &[ParamDesc] {
        PARAMS
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        match name {
            "focus" => Some(ParamValue::Float(self.focus)),
            "aperture" => Some(ParamValue::Float(self.aperture)),
            "max_blur" => Some(ParamValue::Float(self.max_blur)),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> bool {
        match (name, value) {
            ("focus", ParamValue::Float(v)) => {
                self.focus = v;
                true
            }
            ("aperture", ParamValue::Float(v)) => {
                self.aperture = v;
                true
            }
            ("max_blur", ParamValue::Float(v)) => {
                self.max_blur = v;
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
