//! Interactive tour of the effect chain: a couple of spinning triangles
//! rendered through whatever passes are currently toggled on.
//!
//! Keys 1-9 toggle individual effects, 0 turns everything off.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use afterimage::effects::{
    BloomPass, DofPass, EdgePass, FxaaPass, KaleidoscopePass, LutPass, Lut3d, NoiseWarpPass,
    RgbShiftPass, ZoomBlurPass,
};
use afterimage::{Camera, ChainConfig, EffectChain, GpuContext, Mat4, ScreenTarget, Vec3};

const KEY_BINDINGS: &[(KeyCode, &str)] = &[
    (KeyCode::Digit1, "fxaa"),
    (KeyCode::Digit2, "bloom"),
    (KeyCode::Digit3, "dof"),
    (KeyCode::Digit4, "kaleidoscope"),
    (KeyCode::Digit5, "noisewarp"),
    (KeyCode::Digit6, "rgbshift"),
    (KeyCode::Digit7, "zoomblur"),
    (KeyCode::Digit8, "edge"),
    (KeyCode::Digit9, "lut"),
];

const SCENE_SHADER: &str = r#"
struct SceneUniforms {
    mvp: mat4x4f,
    time: f32,
}
@group(0) @binding(0) var<uniform> u: SceneUniforms;

struct VsOut {
    @builtin(position) pos: vec4f,
    @location(0) color: vec3f,
}

@vertex
fn vs(@builtin(vertex_index) vi: u32) -> VsOut {
    var positions = array<vec3f, 6>(
        vec3f(-1.0, -0.8, 0.0),
        vec3f(1.0, -0.8, 0.0),
        vec3f(0.0, 1.0, 0.0),
        vec3f(-1.4, -1.0, -2.0),
        vec3f(1.4, -1.0, -2.0),
        vec3f(0.0, 1.2, -2.0),
    );
    var colors = array<vec3f, 6>(
        vec3f(1.0, 0.2, 0.1),
        vec3f(0.1, 1.0, 0.3),
        vec3f(0.2, 0.3, 1.0),
        vec3f(0.6, 0.5, 0.1),
        vec3f(0.1, 0.5, 0.6),
        vec3f(0.5, 0.1, 0.6),
    );

    var out: VsOut;
    out.pos = u.mvp * vec4f(positions[vi], 1.0);
    out.color = colors[vi] * (0.75 + 0.25 * sin(u.time + f32(vi)));
    return out;
}

@fragment
fn fs(in: VsOut) -> @location(0) vec4f {
    return vec4f(in.color, 1.0);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    mvp: [[f32; 4]; 4],
    time: f32,
    _pad: [f32; 3],
}

/// The demo's stand-in for a real application's scene renderer.
struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SceneRenderer {
    fn new(gpu: &GpuContext, color_format: wgpu::TextureFormat) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Demo Scene"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Demo Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Demo Scene"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Demo Scene"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Demo Scene"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Demo Scene"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: afterimage::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    fn update(&self, gpu: &GpuContext, mvp: Mat4, time: f32) {
        let uniforms = SceneUniforms {
            mvp: mvp.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}

/// A warm-grade lookup table, generated instead of shipped as an asset.
fn warm_lut_text(size: u32) -> String {
    let step = 1.0 / (size - 1) as f32;
    let mut text = format!("# generated warm grade\nLUT_3D_SIZE {size}\n");
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                let (rf, gf, bf) = (r as f32 * step, g as f32 * step, b as f32 * step);
                let _ = writeln!(
                    text,
                    "{:.5} {:.5} {:.5}",
                    (rf * 1.1).min(1.0),
                    gf,
                    bf * 0.85,
                );
            }
        }
    }
    text
}

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    gpu: GpuContext,
    chain: EffectChain,
    scene: SceneRenderer,
    camera: Camera,
    start: Instant,
}

impl State {
    fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to find a suitable GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Warp Chain Demo"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))
        .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let gpu = GpuContext::from_parts(device, queue);

        let mut chain = EffectChain::new(
            &gpu,
            ChainConfig::new(surface_config.width, surface_config.height),
        )
        .unwrap();
        chain.set_clear_color(wgpu::Color {
            r: 0.02,
            g: 0.02,
            b: 0.04,
            a: 1.0,
        });

        let setup = chain.pass_setup();
        chain.add_pass(FxaaPass::new(&gpu, &setup)).unwrap();
        chain.add_pass(BloomPass::new(&gpu, &setup).unwrap()).unwrap();
        chain.add_pass(DofPass::new(&gpu, &setup)).unwrap();
        chain.add_pass(KaleidoscopePass::new(&gpu, &setup)).unwrap();
        chain.add_pass(NoiseWarpPass::new(&gpu, &setup)).unwrap();
        chain.add_pass(RgbShiftPass::new(&gpu, &setup)).unwrap();
        chain.add_pass(ZoomBlurPass::new(&gpu, &setup)).unwrap();
        chain.add_pass(EdgePass::new(&gpu, &setup)).unwrap();
        let lut = Lut3d::parse(&warm_lut_text(16)).unwrap();
        chain.add_pass(LutPass::new(&gpu, &setup, &lut)).unwrap();
        chain.passes_mut().disable_all();
        chain.passes_mut().set_enabled_by_name("fxaa", true);

        let scene = SceneRenderer::new(&gpu, chain.config().format);
        let camera = Camera::new()
            .at(0.0, 0.0, 4.0)
            .looking_at(Vec3::ZERO)
            .with_fov(70.0)
            .with_clip(0.1, 50.0);

        log::info!("keys 1-9 toggle effects, 0 disables all");

        Self {
            window,
            surface,
            surface_config,
            gpu,
            chain,
            scene,
            camera,
            start: Instant::now(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
        if let Err(err) = self.chain.reinit(&self.gpu, ChainConfig::new(width, height)) {
            log::error!("chain reinit failed: {err}");
        }
    }

    fn toggle(&mut self, code: KeyCode) {
        if code == KeyCode::Digit0 {
            self.chain.passes_mut().disable_all();
            log::info!("all passes off");
            return;
        }
        let Some((_, name)) = KEY_BINDINGS.iter().find(|(key, _)| *key == code) else {
            return;
        };
        let enabled = self
            .chain
            .passes()
            .by_name(name)
            .map(|p| p.enabled())
            .unwrap_or(false);
        self.chain.passes_mut().set_enabled_by_name(name, !enabled);
        log::info!("{name}: {}", if enabled { "off" } else { "on" });
    }

    fn render(&mut self) {
        let time = self.start.elapsed().as_secs_f32();

        let (w, h) = self.chain.logical_size();
        let aspect = w as f32 / h as f32;
        let model = Mat4::from_rotation_y(time * 0.6);
        let mvp = self.camera.projection_matrix(aspect) * self.camera.view_matrix() * model;
        self.scene.update(&self.gpu, mvp, time);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return;
            }
            Err(err) => {
                log::error!("surface error: {err}");
                return;
            }
        };

        {
            let scene_pass = self
                .chain
                .begin_capture_with_camera(&self.gpu, time, &self.camera)
                .unwrap();
            self.scene.draw(scene_pass);
        }
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let screen = ScreenTarget {
            view: &view,
            format: self.surface_config.format,
            width: self.surface_config.width,
            height: self.surface_config.height,
        };
        self.chain.end_capture_present(&self.gpu, &screen).unwrap();

        output.present();
    }
}

#[derive(Default)]
struct App {
    state: Option<State>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window = Arc::new(
                event_loop
                    .create_window(Window::default_attributes().with_title("afterimage — warp chain"))
                    .unwrap(),
            );
            self.state = Some(State::new(window));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else { return };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        state.toggle(code);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                state.render();
                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::default();
    event_loop.run_app(&mut app).unwrap();
}
