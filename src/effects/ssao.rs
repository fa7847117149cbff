use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/ssao.wgsl"),
    pixel: None,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SsaoUniforms {
    camera_near: f32,
    camera_far: f32,
    fog_near: f32,
    fog_far: f32,
    fog_enabled: u32,
    only_ao: u32,
    ao_clamp: f32,
    lum_influence: f32,
}

/// Screen-space ambient occlusion from the scene depth buffer.
///
/// `camera_near`/`camera_far` must match the clip planes the scene was
/// rendered with, or depth linearization comes out wrong. Samples the raw
/// scene depth, so it is incompatible with multisampled chains.
pub struct SsaoPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    camera_near: f32,
    camera_far: f32,
    fog_near: f32,
    fog_far: f32,
    fog_enabled: bool,
    only_ao: bool,
    ao_clamp: f32,
    lum_influence: f32,
}

impl SsaoPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self {
            toggle: PassToggle::new("ssao"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "SSAO",
                &SHADER,
                std::mem::size_of::<SsaoUniforms>() as u64,
                true,
            ),
            camera_near: 1.0,
            camera_far: 100.0,
            fog_near: 5.0,
            fog_far: 100.0,
            fog_enabled: false,
            only_ao: false,
            ao_clamp: 0.25,
            lum_influence: 0.7,
        }
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.camera_near = near;
        self.camera_far = far;
    }

    pub fn set_fog(&mut self, enabled: bool, near: f32, far: f32) {
        self.fog_enabled = enabled;
        self.fog_near = near;
        self.fog_far = far;
    }

    pub fn only_ao(&self) -> bool {
        self.only_ao
    }

    /// Show the occlusion term alone instead of modulating the image.
    pub fn set_only_ao(&mut self, only_ao: bool) {
        self.only_ao = only_ao;
    }

    pub fn ao_clamp(&self) -> f32 {
        self.ao_clamp
    }

    pub fn set_ao_clamp(&mut self, ao_clamp: f32) {
        self.ao_clamp = ao_clamp;
    }

    pub fn lum_influence(&self) -> f32 {
        self.lum_influence
    }

    /// How much pixel luminance shields against occlusion darkening.
    pub fn set_lum_influence(&mut self, lum_influence: f32) {
        self.lum_influence = lum_influence;
    }
}

impl EffectPass for SsaoPass {
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
        let params = SsaoUniforms {
            camera_near: self.camera_near,
            camera_far: self.camera_far,
            fog_near: self.fog_near,
            fog_far: self.fog_far,
            fog_enabled: self.fog_enabled as u32,
            only_ao: self.only_ao as u32,
            ao_clamp: self.ao_clamp,
            lum_influence: self.lum_influence,
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

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
