//! # Afterimage
//!
//! **A screen-space post-processing chain for wgpu that stays out of your
//! render loop.**
//!
//! Render your scene once into the chain's off-screen target, and an ordered
//! set of toggle-able effects — bloom, blur, FXAA, depth of field, edge
//! detection, color grading — runs over it before anything reaches the
//! screen. Two ping-pong buffers chain any number of enabled passes without
//! allocating per pass or per frame.
//!
//! ## Quick Start
//!
//! ```no_run
//! use afterimage::{Camera, ChainConfig, EffectChain, GpuContext, ScreenTarget};
//! use afterimage::effects::{BloomPass, FxaaPass, RgbShiftPass};
//!
//! let gpu = GpuContext::headless().unwrap();
//! let mut chain = EffectChain::new(&gpu, ChainConfig::new(1280, 720)).unwrap();
//!
//! let setup = chain.pass_setup();
//! chain.add_pass(FxaaPass::new(&gpu, &setup)).unwrap();
//! chain.add_pass(BloomPass::new(&gpu, &setup).unwrap()).unwrap();
//! chain.add_pass(RgbShiftPass::new(&gpu, &setup)).unwrap();
//! chain.passes_mut().set_enabled_by_name("rgbshift", false);
//!
//! let camera = Camera::new().at(0.0, 2.0, 6.0);
//! # let time = 0.0;
//! let scene_pass = chain.begin_capture_with_camera(&gpu, time, &camera).unwrap();
//! // ... record scene draws into `scene_pass`, using chain.scene_matrices() ...
//! chain.end_capture(&gpu).unwrap();
//!
//! // Blit the processed frame into your surface texture:
//! # let (view, format): (wgpu::TextureView, wgpu::TextureFormat) = todo!();
//! let screen = ScreenTarget { view: &view, format, width: 1280, height: 720 };
//! chain.present(&gpu, &screen).unwrap();
//! ```
//!
//! ## Philosophy
//!
//! - **The scene is yours** — between `begin_capture` and `end_capture` the
//!   chain hands you a plain `wgpu::RenderPass` and never inspects what you
//!   draw into it.
//! - **Passes are uniform** — every effect is one [`EffectPass`] behind the
//!   same contract; the chain never special-cases a concrete effect.
//! - **No steady-state allocation** — three targets at init, reused forever;
//!   toggling passes costs nothing.
//! - **Misconfiguration degrades, state errors don't** — a pass without a
//!   shader variant for your chain is logged and skipped; a mismatched
//!   begin/end is an error you hear about.

mod blit;
mod camera;
mod chain;
pub mod effects;
mod error;
mod gpu;
mod params;
mod pass;
mod quad;
mod registry;
mod target;

pub use camera::Camera;
pub use chain::{
    AddressingMode, ChainConfig, EffectChain, OutputHandle, SceneMatrices, ScreenTarget,
};
pub use error::ChainError;
pub use gpu::GpuContext;
pub use params::{ParamDesc, ParamValue};
pub use pass::{EffectPass, FilterPass, FrameUniforms, PassSetup, PassToggle, RenderContext, ShaderVariants};
pub use quad::{FullscreenQuad, QuadVertex};
pub use registry::PassRegistry;
pub use target::{DEPTH_FORMAT, FrameBuffers, RenderTarget};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
