use std::any::Any;

use crate::gpu::GpuContext;
use crate::params::{ParamDesc, ParamValue};
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/rgb_shift.wgsl"),
    pixel: None,
};

const PARAMS: &[ParamDesc] = &[
    ParamDesc {
        name: "amount",
        min: 0.0,
        max: 0.1,
        default: ParamValue::Float(0.005),
    },
    ParamDesc {
        name: "angle",
        min: 0.0,
        max: std::f32::consts::TAU,
        default: ParamValue::Float(0.0),
    },
];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct RgbShiftUniforms {
    amount: f32,
    angle: f32,
    _pad: [f32; 2],
}

/// Splits the red and blue channels apart along a configurable angle.
pub struct RgbShiftPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    amount: f32,
    angle: f32,
}

impl RgbShiftPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("rgbshift"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "RGB Shift",
                &SHADER,
                std::mem::size_of::<RgbShiftUniforms>() as u64,
                false,
            ),
            amount: 0.005,
            angle: 0.0,
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }
}

impl EffectPass for RgbShiftPass {
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
        let params = RgbShiftUniforms {
            amount: self.amount,
            angle: self.angle,
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

    fn parameter_descriptors(&self) -> &[ParamDesc] {
        PARAMS
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        match name {
            "amount" => Some(ParamValue::Float(self.amount)),
            "angle" => Some(ParamValue::Float(self.angle)),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> bool {
        match (name, value) {
            ("amount", ParamValue::Float(v)) => {
                self.amount = v;
                true
            }
            ("angle", ParamValue::Float(v)) => {
                self.angle = v;
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
