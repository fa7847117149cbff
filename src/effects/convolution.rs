use std::any::Any;

use crate::gpu::GpuContext;
use crate::pass::{EffectPass, FilterPass, PassSetup, PassToggle, RenderContext, ShaderVariants};

pub(crate) const SHADER: ShaderVariants = ShaderVariants {
    normalized: include_str!("shaders/convolution.wgsl"),
    pixel: Some(include_str!("shaders/convolution_pixel.wgsl")),
};

/// Largest kernel the uniform block can hold (eight vec4 rows).
pub const MAX_KERNEL_SIZE: usize = 32;

/// Separable Gaussian weights for the given sigma, normalized to sum to one.
///
/// Kernel width follows the three-sigma rule, capped at [`MAX_KERNEL_SIZE`].
pub(crate) fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let mut size = (2.0 * (sigma * 3.0).ceil() + 1.0) as usize;
    if size > MAX_KERNEL_SIZE {
        size = MAX_KERNEL_SIZE;
    }

    let half_width = (size - 1) as f32 * 0.5;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half_width;
            // The 1/(sqrt(2 pi) sigma) term cancels in normalization.
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ConvolutionUniforms {
    image_increment: [f32; 2],
    kernel_size: u32,
    _pad: f32,
    // Sixteen-byte stride as required in uniform address space.
    kernel: [[f32; 4]; 8],
}

impl ConvolutionUniforms {
    pub(crate) fn new(image_increment: [f32; 2], weights: &[f32]) -> Self {
        let mut kernel = [[0.0f32; 4]; 8];
        let count = weights.len().min(MAX_KERNEL_SIZE);
        for (i, w) in weights.iter().take(count).enumerate() {
            kernel[i / 4][i % 4] = *w;
        }
        Self {
            image_increment,
            kernel_size: count as u32,
            _pad: 0.0,
            kernel,
        }
    }
}

/// One-dimensional Gaussian convolution along a configurable step vector.
///
/// Two of these back to back, one horizontal and one vertical, make a cheap
/// separable blur; that is exactly what [`BloomPass`](super::BloomPass) does
/// internally.
pub struct ConvolutionPass {
    toggle: PassToggle,
    filter: Option<FilterPass>,
    image_increment: [f32; 2],
    kernel: Vec<f32>,
    sigma: f32,
}

impl ConvolutionPass {
    pub fn new(gpu: &GpuContext, setup: &PassSetup) -> Self {
        Self::with_increment(gpu, setup, [1.0 / 512.0, 0.0])
    }

    pub fn with_increment(gpu: &GpuContext, setup: &PassSetup, image_increment: [f32; 2]) -> Self {
        let sigma = 4.0;
        Self {
            toggle: PassToggle::new("convolution"),
            filter: FilterPass::for_mode(
                gpu,
                setup,
                "Convolution",
                &SHADER,
                std::mem::size_of::<ConvolutionUniforms>() as u64,
                false,
            ),
            image_increment,
            kernel: gaussian_kernel(sigma),
            sigma,
        }
    }

    pub fn image_increment(&self) -> [f32; 2] {
        self.image_increment
    }

    /// Step between taps, in normalized source coordinates.
    pub fn set_image_increment(&mut self, image_increment: [f32; 2]) {
        self.image_increment = image_increment;
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Rebuilds the kernel; width follows the three-sigma rule.
    pub fn set_sigma(&mut self, sigma: f32) {
        self.sigma = sigma;
        self.kernel = gaussian_kernel(sigma);
    }

    pub(crate) fn uniforms(&self) -> ConvolutionUniforms {
        ConvolutionUniforms::new(self.image_increment, &self.kernel)
    }
}

impl EffectPass for ConvolutionPass {
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
        let params = self.uniforms();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized() {
        for sigma in [0.5, 1.0, 4.0, 10.0] {
            let kernel = gaussian_kernel(sigma);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma {sigma}: sum {sum}");
        }
    }

    #[test]
    fn kernel_is_symmetric_and_peaked_in_the_middle() {
        let kernel = gaussian_kernel(4.0);
        let n = kernel.len();
        assert_eq!(n % 2, 1);
        for i in 0..n / 2 {
            assert!((kernel[i] - kernel[n - 1 - i]).abs() < 1e-6);
        }
        let peak = kernel[n / 2];
        assert!(kernel.iter().all(|&w| w <= peak));
    }

    #[test]
    fn kernel_width_follows_three_sigma_up_to_the_cap() {
        assert_eq!(gaussian_kernel(1.0).len(), 7);
        assert_eq!(gaussian_kernel(4.0).len(), 25);
        // Three-sigma width would exceed the uniform block; capped.
        assert_eq!(gaussian_kernel(100.0).len(), MAX_KERNEL_SIZE);
    }

    #[test]
    fn uniforms_pack_row_major_vec4s() {
        let uniforms = ConvolutionUniforms::new([0.25, 0.0], &[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(uniforms.kernel_size, 5);
        assert_eq!(uniforms.kernel[0], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(uniforms.kernel[1][0], 0.5);
        assert_eq!(uniforms.kernel[1][1], 0.0);
    }
}
