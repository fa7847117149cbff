use std::any::Any;

use crate::gpu::GpuContext;
use crate::params::{ParamDesc, ParamValue};
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/zoom_blur.wgsl"),
    pixel: None,
};

const PARAMS: &[ParamDesc] = &[
    ParamDesc {
        name: "center_x",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.5),
    },
    ParamDesc {
        name: "center_y",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.5),
    },
    ParamDesc {
        name: "exposure",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.48),
    },
    ParamDesc {
        name: "decay",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.9),
    },
    ParamDesc {
        name: "density",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.25),
    },
    ParamDesc {
        name: "weight",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(0.25),
    },
    ParamDesc {
        name: "clamp",
        min: 0.0,
        max: 1.0,
        default: ParamValue::Float(1.0),
    },
];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ZoomBlurUniforms {
    center: [f32; 2],
    exposure: f32,
    decay: f32,
    density: f32,
    weight: f32,
    clamp_max: f32,
    _pad: f32,
}

/// Radial streaking toward a focal point, light-shaft style.
pub struct ZoomBlurPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    center: [f32; 2],
    exposure: f32,
    decay: f32,
    density: f32,
    weight: f32,
    clamp_max: f32,
}

impl ZoomBlurPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("zoomblur"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Zoom Blur",
                &SHADER,
                std::mem::size_of::<ZoomBlurUniforms>() as u64,
                false,
            ),
            center: [0.5, 0.5],
            exposure: 0.48,
            decay: 0.9,
            density: 0.25,
            weight: 0.25,
            clamp_max: 1.0,
        }
    }

    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center = [x, y];
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure;
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay;
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = density;
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn clamp_max(&self) -> f32 {
        self.clamp_max
    }

    pub fn set_clamp_max(&mut self, clamp_max: f32) {
        self.clamp_max = clamp_max;
    }
}

impl EffectPass for ZoomBlurPass {
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
        let params = ZoomBlurUniforms {
            center: self.center,
            exposure: self.exposure,
            decay: self.decay,
            density: self.density,
            weight: self.weight,
            clamp_max: self.clamp_max,
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

    fn parameter_descriptors(&self) -> &[ParamDesc] {
        PARAMS
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        match name {
            "center_x" => Some(ParamValue::Float(self.center[0])),
            "center_y" => Some(ParamValue::Float(self.center[1])),
            "exposure" => Some(ParamValue::Float(self.exposure)),
            "decay" => Some(ParamValue::Float(self.decay)),
            "density" => Some(ParamValue::Float(self.density)),
            "weight" => Some(ParamValue::Float(self.weight)),
            "clamp" => Some(ParamValue::Float(self.clamp_max)),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> bool {
        let Some(v) = value.as_float() else {
            return false;
        };
        match name {
            "center_x" => self.center[0] = v,
            "center_y" => self.center[1] = v,
            "exposure" => self.exposure = v,
            "decay" => self.decay = v,
            "density" => self.density = v,
            "weight" => self.weight = v,
            "clamp" => self.clamp_max = v,
            _ => return false,
        }
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
