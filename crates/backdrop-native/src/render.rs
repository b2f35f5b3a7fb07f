use glam::{Mat4, Vec3};
use nebula_backdrop::constants::{FREEZE_COLOR, SPHERE_RADIUS};
use nebula_backdrop::{Frame, FrameHost};
use instant::Instant;
use wgpu::util::DeviceExt;

static SCENE_WGSL: &str = include_str!("scene.wgsl");

// Instance buffer capacity; extra sprites are dropped for the frame
const MAX_INSTANCES: usize = 4096;

// Orbit camera, matching the plugin editor's framing
const CAMERA_EYE: [f32; 3] = [977.0, 443.0, 877.0];
const CAMERA_TARGET: [f32; 3] = [172.0, 80.0, -20.0];
const CAMERA_FOVY_DEG: f32 = 75.0;
const CAMERA_ZNEAR: f32 = 10.0;
const CAMERA_ZFAR: f32 = 4000.0;
const CAMERA_AUTO_ROTATE: f32 = 0.02; // radians per second

// Sprite sizing per object kind
const PARTICLE_SPRITE_SCALE: f32 = 0.5;
const WAVE_SPRITE_SCALE: f32 = 1.8;
const CUBE_MARKER_SCALE: f32 = 12.0;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos: [f32; 3],
    scale: f32,
    color: [f32; 4],
    glow: f32,
}

/// Camera slowly circling its target, like an auto-rotating orbit control.
struct OrbitCamera {
    target: Vec3,
    offset: Vec3,
    angle: f32,
}

impl OrbitCamera {
    fn new() -> Self {
        let target = Vec3::from(CAMERA_TARGET);
        Self {
            target,
            offset: Vec3::from(CAMERA_EYE) - target,
            angle: 0.0,
        }
    }

    fn eye(&self) -> Vec3 {
        self.target + Mat4::from_rotation_y(self.angle).transform_vector3(self.offset)
    }
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    camera: OrbitCamera,
    instances: Vec<InstanceData>,
    frames: u32,
    stats_since: Instant,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
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
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
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
            label: Some("scene"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad corners for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<InstanceData>() * MAX_INSTANCES) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
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
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: sprite instances
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 32,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            bind_group,
            width: size.width.max(1),
            height: size.height.max(1),
            camera: OrbitCamera::new(),
            instances: Vec::with_capacity(MAX_INSTANCES),
            frames: 0,
            stats_since: Instant::now(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn uniforms(&self) -> Uniforms {
        let aspect = self.width as f32 / self.height as f32;
        let eye = self.camera.eye();
        let proj = Mat4::perspective_rh(
            CAMERA_FOVY_DEG.to_radians(),
            aspect,
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        );
        let view = Mat4::look_at_rh(eye, self.camera.target, Vec3::Y);
        let forward = (self.camera.target - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        Uniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
        }
    }

    fn push(&mut self, pos: Vec3, scale: f32, color: [f32; 3], alpha: f32, glow: f32) {
        if self.instances.len() < MAX_INSTANCES {
            self.instances.push(InstanceData {
                pos: pos.to_array(),
                scale,
                color: [color[0], color[1], color[2], alpha],
                glow,
            });
        }
    }

    fn build_instances(&mut self, frame: &Frame<'_>) {
        self.instances.clear();

        for sheet in [frame.wave.top(), frame.wave.bottom()] {
            for ((pos, scale), color) in sheet.positions.iter().zip(&sheet.scales).zip(&sheet.colors) {
                self.push(*pos, scale.max(1.0) * WAVE_SPRITE_SCALE, *color, 0.8, 0.3);
            }
        }

        for emitter in frame.nebula.emitters() {
            for p in emitter.particles().iter().filter(|p| !p.dead) {
                let glow = if p.burnout.is_some() { 1.0 } else { 0.5 };
                self.push(
                    p.position,
                    p.radius * p.scale * PARTICLE_SPRITE_SCALE,
                    p.color,
                    p.alpha,
                    glow,
                );
            }
        }

        let light_on = frame.light.intensity > 0.0;
        for sphere in frame.spheres {
            let frozen = sphere.color == FREEZE_COLOR;
            let spin = 0.5 + 0.5 * sphere.rotation.y.sin();
            self.push(
                sphere.position,
                SPHERE_RADIUS * sphere.scale.x * 2.0,
                sphere.color,
                if light_on { 0.9 } else { 0.4 },
                if frozen { 1.0 } else { spin },
            );
        }

        // cube corners from the current scale/position
        let half = frame.cube.half_extents() * frame.cube.scale;
        let center = frame.cube.position;
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = center + half * Vec3::new(sx, sy, sz);
                    self.push(corner, CUBE_MARKER_SCALE, [0.57, 0.62, 0.86], 0.7, 0.2);
                }
            }
        }
    }
}

impl FrameHost for GpuState<'_> {
    fn update_controls(&mut self, dt: f32) {
        self.camera.angle = (self.camera.angle + CAMERA_AUTO_ROTATE * dt) % std::f32::consts::TAU;

        self.frames += 1;
        let elapsed = self.stats_since.elapsed().as_secs_f32();
        if elapsed >= 5.0 {
            log::debug!(
                "[stats] {:.1} fps, {} sprites",
                self.frames as f32 / elapsed,
                self.instances.len()
            );
            self.frames = 0;
            self.stats_since = Instant::now();
        }
    }

    fn render(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms()));

        self.build_instances(frame);
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&self.instances));

        let light = (frame.light.intensity > 0.0) as u8 as f64;
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
                            r: 0.02 + 0.02 * light,
                            g: 0.02 + 0.02 * light,
                            b: 0.04 + 0.03 * light,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..self.instances.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
