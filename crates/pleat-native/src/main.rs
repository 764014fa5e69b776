mod sim;

use std::time::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use glam::{Mat4, Vec3};
use pleat_core::{
    ClockFrames, FrameOutput, Phase, PointerState, WallConfig, WallSession, WorkerSource,
    ESTIMATOR_INTERVAL_MS,
};
use sim::{SimHandControls, SimKey};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    // time, effective compression, strip count, unused
    params: [f32; 4],
}

/// GPU buffers for one wall. Index and UV buffers only depend on the strip
/// count; positions are rewritten every frame.
struct WallMesh {
    strips: usize,
    position_vb: wgpu::Buffer,
    uv_vb: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl WallMesh {
    fn new(device: &wgpu::Device, strips: usize, uvs: &[glam::Vec2], indices: &[u32]) -> Self {
        let position_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("wall_positions"),
            size: (uvs.len() * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uv_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("wall_uvs"),
            contents: bytemuck::cast_slice(uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("wall_indices"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            strips,
            position_vb,
            uv_vb,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    mesh: Option<WallMesh>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wall_shader"),
            source: wgpu::ShaderSource::Wgsl(pleat_core::WALL_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: positions, rewritten every frame
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: photo uvs
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wall_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // both faces of every strip are visible while folding
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            depth_view,
            mesh: None,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.width, self.height);
    }

    /// Camera pulled back far enough to keep the wall's bounding sphere in view.
    fn view_proj(&self, radius: f32) -> [[f32; 4]; 4] {
        let aspect = self.width as f32 / self.height as f32;
        let fit = FOV_Y.min(FOV_Y * aspect);
        let distance = (radius.max(1.0) / (fit * 0.5).sin()) * 1.05;
        let proj = Mat4::perspective_rh(FOV_Y, aspect, 0.1, distance * 4.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, distance), Vec3::ZERO, Vec3::Y);
        (proj * view).to_cols_array_2d()
    }

    fn render(
        &mut self,
        session: &WallSession,
        output: Option<FrameOutput>,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let wall = session.wall().zip(output);
        if let Some((wall, out)) = wall {
            let strips = wall.params().strips();
            if self.mesh.as_ref().map(|m| m.strips) != Some(strips) {
                log::debug!("[render] allocating mesh for {strips} strips");
                self.mesh = Some(WallMesh::new(&self.device, strips, wall.uvs(), wall.indices()));
            }
            if let Some(mesh) = &self.mesh {
                self.queue.write_buffer(
                    &mesh.position_vb,
                    0,
                    bytemuck::cast_slice(wall.vertices().as_flat()),
                );
            }
            let uniforms = Uniforms {
                view_proj: self.view_proj(out.bounds.bounding_radius()),
                model: wall.orientation().model_matrix().to_cols_array_2d(),
                params: [
                    session.wall_time().as_secs_f32(),
                    out.control.effective_compression,
                    strips as f32,
                    0.0,
                ],
            };
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        } else {
            self.mesh = None;
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (Some(mesh), Some(_)) = (&self.mesh, output) {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.position_vb.slice(..));
                rpass.set_vertex_buffer(1, mesh.uv_vb.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// `--strips N`, `--seed N`, `--height H`, `--fit`.
fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<WallConfig> {
    let mut config = WallConfig::default();
    let mut args = args.skip(1);
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| anyhow::anyhow!("{flag} expects a value"))
        };
        match flag.as_str() {
            "--strips" => config.strips = value()?.parse()?,
            "--seed" => config.seed = value()?.parse()?,
            "--height" => config.height = value()?.parse()?,
            "--fit" => config.fit_to_photo = true,
            other => anyhow::bail!("unknown argument {other}"),
        }
    }
    Ok(config)
}

/// Native stand-in for the camera snapshot: the window itself is the photo.
fn capture(session: &mut WallSession, hand: &SimHandControls, width: u32, height: u32) {
    if !session.begin_capture() {
        return;
    }
    if let Err(e) = session.photo_ready(width, height) {
        log::error!("[capture] could not build the wall: {e}");
        session.reset();
        return;
    }
    match WorkerSource::spawn(
        hand.detector(),
        ClockFrames::new(),
        Duration::from_millis(ESTIMATOR_INTERVAL_MS),
    ) {
        Ok(source) => session.attach_source(Box::new(source)),
        Err(e) => log::warn!("[capture] hand estimator not started ({e}); pointer only"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = parse_args(std::env::args())?;
    let mut session = WallSession::new(config)?;
    let hand = SimHandControls::new();
    let mut pointer = PointerState::default();
    log::info!(
        "[app] C capture, R reset, 1-9 strips x8, Space show hand, W/S open/close, arrows move hand"
    );

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Pleat (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window))?;
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => pointer.moved(
            position.x as f32,
            position.y as f32,
            state.width as f32,
            state.height as f32,
        ),
        Event::WindowEvent {
            event: WindowEvent::CursorLeft { .. },
            ..
        } => pointer.left(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => match logical_key {
            Key::Named(NamedKey::Escape) => elwt.exit(),
            Key::Named(NamedKey::Space) => hand.press(SimKey::ToggleHand),
            Key::Named(NamedKey::ArrowLeft) => hand.press(SimKey::Left),
            Key::Named(NamedKey::ArrowRight) => hand.press(SimKey::Right),
            Key::Named(NamedKey::ArrowUp) => hand.press(SimKey::Up),
            Key::Named(NamedKey::ArrowDown) => hand.press(SimKey::Down),
            Key::Character(ref c) => match c.as_str() {
                "c" => capture(&mut session, &hand, state.width, state.height),
                "r" => session.reset(),
                "w" => hand.press(SimKey::Open),
                "s" => hand.press(SimKey::Close),
                digit => {
                    if let Some(n) = digit.parse::<usize>().ok().filter(|n| *n > 0) {
                        if let Err(e) = session.set_strips(n * 8) {
                            log::warn!("[app] strip change rejected: {e}");
                        }
                    }
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = now - last_frame;
            last_frame = now;
            session.tick(dt);
            let output = match session.phase() {
                Phase::Interactive => session.frame(pointer.position()),
                _ => session.wall().map(|w| w.last_output()),
            };
            match state.render(&session, output) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[render] out of GPU memory");
                    elwt.exit()
                }
                Err(e) => log::warn!("[render] {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(list: &'a [&str]) -> impl Iterator<Item = String> + 'a {
        std::iter::once("pleat-native".to_string()).chain(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn default_arguments_give_default_config() {
        assert_eq!(parse_args(args(&[])).unwrap(), WallConfig::default());
    }

    #[test]
    fn arguments_override_config() {
        let config = parse_args(args(&["--strips", "12", "--seed", "9", "--height", "6.5", "--fit"]))
            .unwrap();
        assert_eq!(config.strips, 12);
        assert_eq!(config.seed, 9);
        assert_eq!(config.height, 6.5);
        assert!(config.fit_to_photo);
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse_args(args(&["--strips"])).is_err());
        assert!(parse_args(args(&["--strips", "many"])).is_err());
        assert!(parse_args(args(&["--colour", "red"])).is_err());
    }
}
