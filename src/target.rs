//! Off-screen render targets and the three-buffer frame set.
//!
//! A [`RenderTarget`] is a GPU texture that can be both rendered to (as a
//! color attachment) and sampled from (as a texture binding). This dual
//! capability is what enables ping-pong rendering: one pass writes to target
//! A while reading from target B, then the next pass reverses the roles.
//!
//! Targets are allocated exactly once, at chain construction or explicit
//! reinit. The steady-state frame loop never reallocates, whatever the number
//! of enabled passes.

use crate::chain::{AddressingMode, ChainConfig};
use crate::error::ChainError;
use crate::gpu::GpuContext;

/// Depth format used for the raw scene target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub(crate) struct TargetDesc<'a> {
    pub label: &'a str,
    pub logical: (u32, u32),
    pub allocated: (u32, u32),
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub with_depth: bool,
}

/// An off-screen render target with optional depth.
///
/// The *logical* size is what the caller asked for; the *allocated* size is
/// the texture actually created, which is the next power of two up in
/// [`AddressingMode::Normalized`] chains. Rendering and sampling both stay
/// inside the logical sub-region; the padding is cleared black.
///
/// When multisampled, the target carries a single-sample resolve texture —
/// [`attachment_view`](Self::attachment_view) is what scene draws render
/// into, [`sampled_view`](Self::sampled_view) is what later passes read.
pub struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    resolve_texture: Option<wgpu::Texture>,
    resolve_view: Option<wgpu::TextureView>,
    depth_texture: Option<wgpu::Texture>,
    depth_view: Option<wgpu::TextureView>,
    logical: (u32, u32),
    allocated: (u32, u32),
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl RenderTarget {
    pub(crate) fn new(gpu: &GpuContext, desc: &TargetDesc) -> Result<Self, ChainError> {
        let (width, height) = desc.allocated;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        // Allocation failure is the one wgpu error we want to hand back to
        // the caller instead of panicking the process.
        gpu.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let multisampled = desc.sample_count > 1;
        let color_usage = if multisampled {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
        };

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: extent,
            mip_level_count: 1,
            sample_count: desc.sample_count.max(1),
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: color_usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (resolve_texture, resolve_view) = if multisampled {
            let resolve = gpu.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(desc.label),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: desc.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            });
            let resolve_view = resolve.create_view(&wgpu::TextureViewDescriptor::default());
            (Some(resolve), Some(resolve_view))
        } else {
            (None, None)
        };

        let (depth_texture, depth_view) = if desc.with_depth {
            let depth_usage = if multisampled {
                wgpu::TextureUsages::RENDER_ATTACHMENT
            } else {
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
            };
            let depth = gpu.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(desc.label),
                size: extent,
                mip_level_count: 1,
                sample_count: desc.sample_count.max(1),
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: depth_usage,
                view_formats: &[],
            });
            let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
            (Some(depth), Some(depth_view))
        } else {
            (None, None)
        };

        if let Some(error) = pollster::block_on(gpu.device.pop_error_scope()) {
            return Err(ChainError::Allocation(error.to_string()));
        }

        log::debug!(
            "allocated target '{}': logical {}x{}, texture {}x{}, {} sample(s)",
            desc.label,
            desc.logical.0,
            desc.logical.1,
            width,
            height,
            desc.sample_count.max(1),
        );

        Ok(Self {
            texture,
            view,
            resolve_texture,
            resolve_view,
            depth_texture,
            depth_view,
            logical: desc.logical,
            allocated: desc.allocated,
            format: desc.format,
            sample_count: desc.sample_count.max(1),
        })
    }

    /// The view scene draws and passes render into.
    pub fn attachment_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Resolve attachment for multisampled targets.
    pub fn resolve_view(&self) -> Option<&wgpu::TextureView> {
        self.resolve_view.as_ref()
    }

    /// The single-sample view later passes sample from.
    pub fn sampled_view(&self) -> &wgpu::TextureView {
        self.resolve_view.as_ref().unwrap_or(&self.view)
    }

    /// The single-sample texture behind [`sampled_view`](Self::sampled_view).
    pub fn sampled_texture(&self) -> &wgpu::Texture {
        self.resolve_texture.as_ref().unwrap_or(&self.texture)
    }

    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_view.as_ref()
    }

    pub fn has_depth(&self) -> bool {
        self.depth_texture.is_some()
    }

    /// Size the caller asked for.
    pub fn logical_size(&self) -> (u32, u32) {
        self.logical
    }

    /// Size of the texture actually allocated.
    pub fn allocated_size(&self) -> (u32, u32) {
        self.allocated
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Fraction of the allocated texture covered by the logical region.
    pub fn uv_scale(&self) -> [f32; 2] {
        [
            self.logical.0 as f32 / self.allocated.0 as f32,
            self.logical.1 as f32 / self.allocated.1 as f32,
        ]
    }
}

/// The chain's three targets: one raw scene target (with depth) and two
/// interchangeable, format-identical ping-pong targets (color only).
pub struct FrameBuffers {
    raw: RenderTarget,
    ping: [RenderTarget; 2],
}

impl FrameBuffers {
    pub(crate) fn allocate(gpu: &GpuContext, config: &ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        let logical = (config.width, config.height);
        let allocated = config.allocated_size();

        let raw = RenderTarget::new(
            gpu,
            &TargetDesc {
                label: "Afterimage Raw Scene",
                logical,
                allocated,
                format: config.format,
                sample_count: config.effective_sample_count(),
                with_depth: true,
            },
        )?;

        // The ping-pongs hold filter output only; no depth, never multisampled.
        let ping_a = RenderTarget::new(
            gpu,
            &TargetDesc {
                label: "Afterimage Ping A",
                logical,
                allocated,
                format: config.format,
                sample_count: 1,
                with_depth: false,
            },
        )?;
        let ping_b = RenderTarget::new(
            gpu,
            &TargetDesc {
                label: "Afterimage Ping B",
                logical,
                allocated,
                format: config.format,
                sample_count: 1,
                with_depth: false,
            },
        )?;

        Ok(Self {
            raw,
            ping: [ping_a, ping_b],
        })
    }

    /// The raw scene target, including its depth buffer.
    pub fn raw(&self) -> &RenderTarget {
        &self.raw
    }

    pub(crate) fn ping(&self, index: usize) -> &RenderTarget {
        &self.ping[index]
    }

    /// Depth view of the original scene — the one depth every pass sees,
    /// whatever its position in the chain.
    pub(crate) fn scene_depth(&self) -> &wgpu::TextureView {
        self.raw
            .depth_view()
            .expect("raw scene target is always allocated with depth")
    }
}

pub(crate) fn allocated_extent(mode: AddressingMode, width: u32, height: u32) -> (u32, u32) {
    match mode {
        AddressingMode::Normalized => (width.next_power_of_two(), height.next_power_of_two()),
        AddressingMode::Pixel => (width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_mode_pads_to_power_of_two() {
        assert_eq!(allocated_extent(AddressingMode::Normalized, 800, 600), (1024, 1024));
        assert_eq!(allocated_extent(AddressingMode::Normalized, 512, 512), (512, 512));
        assert_eq!(allocated_extent(AddressingMode::Normalized, 513, 257), (1024, 512));
    }

    #[test]
    fn pixel_mode_allocates_exact() {
        assert_eq!(allocated_extent(AddressingMode::Pixel, 800, 600), (800, 600));
        assert_eq!(allocated_extent(AddressingMode::Pixel, 1, 1), (1, 1));
    }
}
