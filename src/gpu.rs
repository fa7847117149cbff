//! Core GPU context and device management.
//!
//! This module provides [`GpuContext`], the pair of wgpu objects every part of
//! the chain needs: the device for creating resources and the queue for
//! submitting work. Window and surface management deliberately stay with the
//! host application — the chain only ever renders off-screen and blits into
//! whatever texture view the host hands it.
//!
//! # Initialization
//!
//! Hosts that already own a wgpu device (a game, an editor, anything with a
//! swapchain) wrap it with [`GpuContext::from_parts`]. Tools and tests that
//! have no window use [`GpuContext::headless`], which picks an adapter with no
//! surface compatibility requirement.
//!
//! # Example
//!
//! ```no_run
//! use afterimage::GpuContext;
//!
//! let gpu = GpuContext::headless().expect("no GPU available");
//!
//! let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
//!     label: Some("My Buffer"),
//!     size: 1024,
//!     usage: wgpu::BufferUsages::UNIFORM,
//!     mapped_at_creation: false,
//! });
//! gpu.queue.write_buffer(&buffer, 0, &[0u8; 1024]);
//! ```

use crate::error::ChainError;

/// Core GPU context holding wgpu resources.
///
/// Both fields are public to allow direct access to wgpu APIs when needed.
/// The context is typically created once at startup and passed by reference
/// to the chain and every effect pass constructor.
pub struct GpuContext {
    /// The logical GPU device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Create a context without a window.
    ///
    /// Requests an adapter with no compatible surface, which makes this
    /// usable on CI machines and in integration tests. Errors if the host
    /// exposes no adapter at all (software rasterizers count).
    pub fn headless() -> Result<Self, ChainError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|_| ChainError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Afterimage Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))
        .map_err(|e| ChainError::RequestDevice(e.to_string()))?;

        Ok(Self { device, queue })
    }

    /// Wrap a device and queue the host application already owns.
    ///
    /// This is the normal entry point for windowed applications: create your
    /// surface and device however you like, then hand the chain the pieces it
    /// needs.
    pub fn from_parts(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }
}
