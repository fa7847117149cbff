//! The built-in effect passes.
//!
//! Every type here satisfies the [`EffectPass`](crate::EffectPass) contract
//! and is constructed against a chain's [`PassSetup`](crate::PassSetup).
//! Most are one shader and a handful of parameters; [`BloomPass`] is the
//! composite exception with its own internal targets, and [`LutPass`] brings
//! its lookup table with it.

mod bleach_bypass;
mod bloom;
mod contrast;
mod convolution;
mod dof;
mod edge;
mod fxaa;
mod hsb_shift;
mod kaleidoscope;
mod limb_darkening;
mod lut;
mod noise_warp;
mod rgb_shift;
mod ssao;
mod tilt_shift;
mod zoom_blur;

pub use bleach_bypass::BleachBypassPass;
pub use bloom::BloomPass;
pub use contrast::ContrastPass;
pub use convolution::{ConvolutionPass, MAX_KERNEL_SIZE};
pub use dof::DofPass;
pub use edge::EdgePass;
pub use fxaa::FxaaPass;
pub use hsb_shift::HsbShiftPass;
pub use kaleidoscope::KaleidoscopePass;
pub use limb_darkening::LimbDarkeningPass;
pub use lut::{Lut3d, LutPass};
pub use noise_warp::NoiseWarpPass;
pub use rgb_shift::RgbShiftPass;
pub use ssao::SsaoPass;
pub use tilt_shift::TiltShiftPass;
pub use zoom_blur::ZoomBlurPass;
